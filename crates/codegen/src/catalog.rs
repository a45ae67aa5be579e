//! Codegen target catalog.
//!
//! The ordered list of files the model-backed engine is asked to produce.
//! Target paths coincide with the template tree so a codegen pass upgrades
//! the baseline files in place.

use std::fmt;

use blueprint_core::{unique_slugs, Specification};
use serde::Serialize;

use crate::template::{entity_template_paths, TEMPLATE_ROOT};

/// How a target is framed in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Page,
    Layout,
    Api,
    Config,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Page => "page",
            TargetKind::Layout => "layout",
            TargetKind::Api => "api",
            TargetKind::Config => "config",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file the engine is responsible for, identified by its workspace-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodegenTarget {
    pub path: String,
    pub description: String,
    pub kind: TargetKind,
}

impl CodegenTarget {
    fn new(path: impl Into<String>, description: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            kind,
        }
    }

    /// File extension without the leading dot, used to pick a validator.
    pub fn extension(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map_or(self.path.as_str(), |(_, name)| name)
            .rsplit_once('.')
            .map_or("", |(_, ext)| ext)
    }
}

/// Section pages generated for every specification, after the landing page.
const SECTION_PAGES: [(&str, &str); 6] = [
    ("records", "Records table backed by the shared records endpoint"),
    ("entities", "Index of every entity with its fields"),
    ("workflows", "Numbered step lists for each workflow"),
    ("integrations", "Cards describing each external integration"),
    ("auth", "Role-based access guide"),
    ("settings", "Environment variable checklist for deployment"),
];

/// The full target list for `spec`: fixed targets first, then three per
/// entity in declaration order.
pub fn codegen_targets(spec: &Specification) -> Vec<CodegenTarget> {
    let mut targets = vec![
        CodegenTarget::new(
            "app/template/package.json",
            "Package manifest with Next.js, React and TypeScript dependencies and dev/build/start scripts",
            TargetKind::Config,
        ),
        CodegenTarget::new(
            format!("{}/layout.tsx", TEMPLATE_ROOT),
            "Root layout with sidebar navigation to every section",
            TargetKind::Layout,
        ),
        CodegenTarget::new(
            format!("{}/page.tsx", TEMPLATE_ROOT),
            "Landing dashboard with summary metrics",
            TargetKind::Page,
        ),
    ];

    for (section, description) in SECTION_PAGES {
        targets.push(CodegenTarget::new(
            format!("{}/{}/page.tsx", TEMPLATE_ROOT, section),
            description,
            TargetKind::Page,
        ));
    }

    let slugs = unique_slugs(&spec.entity_names(), "entity");
    for (entity, slug) in spec.entities.iter().zip(slugs) {
        let [list, detail, page] = entity_template_paths(&slug);
        targets.push(CodegenTarget::new(
            list,
            format!("List and create API for {}", entity.name),
            TargetKind::Api,
        ));
        targets.push(CodegenTarget::new(
            detail,
            format!("Fetch-by-id API for {}", entity.name),
            TargetKind::Api,
        ));
        targets.push(CodegenTarget::new(
            page,
            format!("List page for {} rendering a table of its fields", entity.name),
            TargetKind::Page,
        ));
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_targets_then_entities() {
        let spec = Specification::from_json(
            r#"{"name": "Clinic", "domain": "health", "entities": [
                {"name": "Patient", "fields": []},
                {"name": "Visit", "fields": []}
            ]}"#,
        )
        .unwrap();
        let targets = codegen_targets(&spec);
        assert_eq!(targets.len(), 9 + 6);
        assert_eq!(targets[0].kind, TargetKind::Config);
        assert_eq!(targets[1].path, "app/template/app/layout.tsx");
        assert_eq!(targets[3].path, "app/template/app/records/page.tsx");
        assert_eq!(targets[9].path, "app/template/app/api/entities/patient/route.ts");
        assert_eq!(
            targets[13].path,
            "app/template/app/api/entities/visit/[id]/route.ts"
        );
        assert_eq!(targets[14].kind, TargetKind::Page);
    }

    #[test]
    fn extension_of_target_path() {
        let t = CodegenTarget::new("app/template/package.json", "", TargetKind::Config);
        assert_eq!(t.extension(), "json");
        let t = CodegenTarget::new("app/template/app/api/entities/x/[id]/route.ts", "", TargetKind::Api);
        assert_eq!(t.extension(), "ts");
        let t = CodegenTarget::new("Makefile", "", TargetKind::Config);
        assert_eq!(t.extension(), "");
    }
}
