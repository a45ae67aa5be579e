//! Template app generator.
//!
//! Expands a specification into a themed Next.js-style application tree plus
//! supporting documents, entirely by string interpolation. The result is a
//! working, inspectable baseline that exists whether or not the model-backed
//! codegen stage runs.
//!
//! Generation is split in two: [`plan_template_app`] is a pure function of
//! the specification returning every path and its content, and
//! [`generate_template_app`] writes that plan.

mod api;
mod docs;
mod pages;
mod shell;
mod theme;

use std::path::{Path, PathBuf};

use blueprint_core::{title_case, unique_slugs, Entity, Field, FieldType, Page, Specification};
use serde_json::{json, Map, Value};

use crate::error::CodegenError;
use crate::write::{write_plan, PlannedFile};

/// Root of the template application, relative to the workspace.
pub const TEMPLATE_ROOT: &str = "app/template/app";

/// The fixed template files, relative to [`TEMPLATE_ROOT`].
///
/// This list is the contract checked by workspace verification; every entry
/// is produced for every specification.
pub const TEMPLATE_FILES: [&str; 13] = [
    "layout.tsx",
    "globals.css",
    "page.tsx",
    "records/page.tsx",
    "entities/page.tsx",
    "workflows/page.tsx",
    "integrations/page.tsx",
    "auth/page.tsx",
    "settings/page.tsx",
    "api/records/route.ts",
    "api/entities/route.ts",
    "api/workflows/route.ts",
    "api/integrations/route.ts",
];

/// An entity together with its disambiguated slug and symbol name.
pub(crate) struct EntityView<'a> {
    pub entity: &'a Entity,
    pub slug: String,
    pub title: String,
}

/// A page together with its disambiguated slug.
pub(crate) struct PageView {
    pub page: Page,
    pub slug: String,
}

/// Everything the individual emitters need, computed once.
pub(crate) struct TemplateContext<'a> {
    pub spec: &'a Specification,
    pub entities: Vec<EntityView<'a>>,
    pub pages: Vec<PageView>,
}

impl<'a> TemplateContext<'a> {
    pub(crate) fn new(spec: &'a Specification) -> Self {
        let entity_slugs = unique_slugs(&spec.entity_names(), "entity");
        let entities = spec
            .entities
            .iter()
            .zip(entity_slugs)
            .map(|(entity, slug)| EntityView {
                entity,
                slug,
                title: title_case(&entity.name),
            })
            .collect();

        let pages = spec.effective_pages();
        let page_names: Vec<&str> = pages.iter().map(|p| p.name.as_str()).collect();
        let page_slugs = unique_slugs(&page_names, "page");
        let pages = pages
            .into_iter()
            .zip(page_slugs)
            .map(|(page, slug)| PageView { page, slug })
            .collect();

        Self {
            spec,
            entities,
            pages,
        }
    }

    pub(crate) fn first_entity(&self) -> Option<&EntityView<'a>> {
        self.entities.first()
    }
}

/// Relative paths of the three files generated for one entity slug:
/// list route, detail route, detail page.
pub fn entity_template_paths(slug: &str) -> [String; 3] {
    [
        format!("{}/api/entities/{}/route.ts", TEMPLATE_ROOT, slug),
        format!("{}/api/entities/{}/[id]/route.ts", TEMPLATE_ROOT, slug),
        format!("{}/entities/{}/page.tsx", TEMPLATE_ROOT, slug),
    ]
}

fn template_path(rel: &str) -> String {
    format!("{}/{}", TEMPLATE_ROOT, rel)
}

/// Documentation and per-entity schema files.
pub fn plan_docs(spec: &Specification) -> Result<Vec<PlannedFile>, CodegenError> {
    docs::plan(&TemplateContext::new(spec))
}

/// The fixed template files followed by the per-entity files.
pub fn plan_template(spec: &Specification) -> Vec<PlannedFile> {
    let ctx = TemplateContext::new(spec);
    let fixed = [
        shell::layout_tsx(&ctx),
        shell::globals_css(&ctx),
        pages::dashboard_page(&ctx),
        pages::records_page(&ctx),
        pages::entities_page(&ctx),
        pages::workflows_page(&ctx),
        pages::integrations_page(&ctx),
        pages::auth_page(),
        pages::settings_page(&ctx),
        api::records_route(&ctx),
        api::entities_route(&ctx),
        api::workflows_route(&ctx),
        api::integrations_route(&ctx),
    ];

    let mut plan: Vec<PlannedFile> = TEMPLATE_FILES
        .iter()
        .zip(fixed)
        .map(|(rel, content)| PlannedFile::new(template_path(rel), content))
        .collect();

    for view in &ctx.entities {
        let [list, detail, page] = entity_template_paths(&view.slug);
        plan.push(PlannedFile::new(list, api::entity_list_route(view)));
        plan.push(PlannedFile::new(detail, api::entity_detail_route(view)));
        plan.push(PlannedFile::new(page, pages::entity_detail_page(view)));
    }
    plan
}

/// The complete plan: docs first, then the template tree.
pub fn plan_template_app(spec: &Specification) -> Result<Vec<PlannedFile>, CodegenError> {
    let mut plan = plan_docs(spec)?;
    plan.extend(plan_template(spec));
    Ok(plan)
}

/// Relative output paths, in generation order, without touching disk.
pub fn template_app_paths(spec: &Specification) -> Result<Vec<PathBuf>, CodegenError> {
    Ok(plan_template_app(spec)?
        .into_iter()
        .map(|f| f.rel_path)
        .collect())
}

/// Write the template app under `root`, returning every written path.
pub fn generate_template_app(
    root: &Path,
    spec: &Specification,
) -> Result<Vec<PathBuf>, CodegenError> {
    let plan = plan_template_app(spec)?;
    let written = write_plan(root, &plan)?;
    tracing::debug!(
        files = written.len(),
        entities = spec.entities.len(),
        "template app written"
    );
    Ok(written)
}

// ── Shared emit helpers ──────────────────────────────────────────────────────

/// Render a JSON value as a JavaScript literal.
pub(crate) fn js_literal(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render a string as a quoted JavaScript string literal.
pub(crate) fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn field_json(f: &Field) -> Value {
    json!({
        "name": f.name,
        "type": f.field_type.as_str(),
        "required": f.required,
    })
}

pub(crate) fn fields_json(entity: &Entity) -> Value {
    Value::Array(entity.fields.iter().map(field_json).collect())
}

/// Fields rendered after a fixed `id` column; a declared `id` is skipped.
pub(crate) fn column_fields_json(entity: &Entity) -> Value {
    Value::Array(
        entity
            .fields
            .iter()
            .filter(|f| f.name != "id")
            .map(field_json)
            .collect(),
    )
}

fn sample_value(field: &Field, n: u32) -> Value {
    match field.field_type {
        FieldType::Number => json!(n * 100),
        FieldType::Boolean => json!(n % 2 == 1),
        FieldType::Date => json!(format!("2024-01-{:02}", n)),
        FieldType::Text => json!(format!("Sample {} notes for record {}", field.name, n)),
        FieldType::Enum => json!(format!("option-{}", n)),
        _ => json!(format!("{} {}", title_case(&field.name), n)),
    }
}

/// Seeded sample record `n` for an entity (or a generic one when the
/// specification has no entities).
pub(crate) fn sample_record(view: Option<&EntityView<'_>>, n: u32) -> Value {
    let mut record = Map::new();
    match view {
        Some(view) => {
            record.insert("id".to_string(), json!(format!("{}-{}", view.slug, n)));
            for field in &view.entity.fields {
                if field.name == "id" {
                    continue;
                }
                record.insert(field.name.clone(), sample_value(field, n));
            }
        }
        None => {
            record.insert("id".to_string(), json!(format!("sample-{}", n)));
            record.insert("name".to_string(), json!(format!("Sample {}", n)));
        }
    }
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with(entities: &str) -> Specification {
        Specification::from_json(&format!(
            r#"{{"name": "Clinic", "domain": "health", "entities": {}}}"#,
            entities
        ))
        .unwrap()
    }

    #[test]
    fn colliding_entity_names_get_distinct_paths() {
        let spec = spec_with(
            r#"[{"name": "Visit", "fields": []}, {"name": "visit!", "fields": []}]"#,
        );
        let paths = template_app_paths(&spec).unwrap();
        assert!(paths.contains(&PathBuf::from("app/template/app/entities/visit/page.tsx")));
        assert!(paths.contains(&PathBuf::from("app/template/app/entities/visit-2/page.tsx")));
        assert!(paths.contains(&PathBuf::from("backend/visit-2.schema.json")));
    }

    #[test]
    fn template_plan_starts_with_fixed_files() {
        let spec = spec_with(r#"[{"name": "Visit", "fields": []}]"#);
        let plan = plan_template(&spec);
        assert_eq!(plan.len(), TEMPLATE_FILES.len() + 3);
        for (file, rel) in plan.iter().zip(TEMPLATE_FILES) {
            assert_eq!(file.rel_path, PathBuf::from(template_path(rel)));
        }
        let tail: Vec<String> = plan[TEMPLATE_FILES.len()..]
            .iter()
            .map(|f| f.rel_path.display().to_string())
            .collect();
        assert_eq!(tail, entity_template_paths("visit").to_vec());
    }

    #[test]
    fn sample_records_follow_field_types() {
        let spec = spec_with(
            r#"[{"name": "Visit", "fields": [
                {"name": "id", "type": "string"},
                {"name": "patient", "type": "string"},
                {"name": "fee", "type": "number"},
                {"name": "paid", "type": "boolean"},
                {"name": "on", "type": "date"},
                {"name": "status", "type": "enum"}
            ]}]"#,
        );
        let ctx = TemplateContext::new(&spec);
        let record = sample_record(ctx.first_entity(), 2);
        assert_eq!(record["id"], "visit-2");
        assert_eq!(record["patient"], "Patient 2");
        assert_eq!(record["fee"], 200);
        assert_eq!(record["paid"], false);
        assert_eq!(record["on"], "2024-01-02");
        assert_eq!(record["status"], "option-2");

        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["id", "patient", "fee", "paid", "on", "status"]);
    }

    #[test]
    fn sample_record_without_entities() {
        let record = sample_record(None, 1);
        assert_eq!(record, json!({"id": "sample-1", "name": "Sample 1"}));
    }

    #[test]
    fn js_string_escapes_quotes() {
        assert_eq!(js_string("say \"hi\""), r#""say \"hi\"""#);
    }
}
