//! Static scaffold: the fixed, model-free set of description files.
//!
//! Writes `backend/data-schema.json`, `app/ui-map.md`,
//! `infra/integrations.json`, `backend/workflows.json` and `meta.json`.

use std::path::{Path, PathBuf};

use blueprint_core::{build_schemas, slugify, title_case, Specification};
use serde::Serialize;

use crate::error::CodegenError;
use crate::write::{write_plan, PlannedFile};

pub const DATA_SCHEMA_PATH: &str = "backend/data-schema.json";
pub const UI_MAP_PATH: &str = "app/ui-map.md";
pub const INTEGRATIONS_PATH: &str = "infra/integrations.json";
pub const WORKFLOWS_PATH: &str = "backend/workflows.json";
pub const META_PATH: &str = "meta.json";

/// Contents of `meta.json`.
#[derive(Debug, Serialize)]
struct Meta<'a> {
    name: &'a str,
    domain: &'a str,
    slug: String,
    entities: Vec<String>,
}

/// Markdown overview of pages and entities.
///
/// Shared by the static scaffold and the template docs so both writers of
/// `app/ui-map.md` produce the same bytes.
pub(crate) fn ui_map_markdown(spec: &Specification) -> String {
    let mut out = format!("# {}\n\n## Pages\n", spec.name);
    for page in spec.effective_pages() {
        out.push_str(&format!("- {}: {}\n", page.name, page.purpose));
    }
    out.push_str("\n## Entities\n");
    for entity in &spec.entities {
        let fields = entity
            .fields
            .iter()
            .map(|f| format!("{} ({})", f.name, f.field_type))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("- {}: {}\n", entity.name, fields));
    }
    out
}

/// The scaffold files for `spec`, in write order.
pub fn plan_scaffold(spec: &Specification) -> Result<Vec<PlannedFile>, CodegenError> {
    let meta = Meta {
        name: &spec.name,
        domain: &spec.domain,
        slug: slugify(&spec.name),
        entities: spec.entities.iter().map(|e| title_case(&e.name)).collect(),
    };

    Ok(vec![
        PlannedFile::json(DATA_SCHEMA_PATH, &build_schemas(spec))?,
        PlannedFile::new(UI_MAP_PATH, ui_map_markdown(spec)),
        PlannedFile::json(INTEGRATIONS_PATH, &spec.integrations)?,
        PlannedFile::json(WORKFLOWS_PATH, &spec.workflows)?,
        PlannedFile::json(META_PATH, &meta)?,
    ])
}

/// Write the static scaffold under `root`, returning the written paths.
pub fn generate_scaffold(root: &Path, spec: &Specification) -> Result<Vec<PathBuf>, CodegenError> {
    let plan = plan_scaffold(spec)?;
    let written = write_plan(root, &plan)?;
    tracing::debug!(files = written.len(), root = %root.display(), "static scaffold written");
    Ok(written)
}
