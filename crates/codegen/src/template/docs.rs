//! Documentation half of the template app: overview, spec dump, page notes
//! and per-entity schema documents.

use serde_json::json;

use super::{fields_json, TemplateContext, TEMPLATE_FILES, TEMPLATE_ROOT};
use crate::error::CodegenError;
use crate::scaffold::{ui_map_markdown, UI_MAP_PATH};
use crate::write::PlannedFile;

pub(super) fn plan(ctx: &TemplateContext<'_>) -> Result<Vec<PlannedFile>, CodegenError> {
    let mut plan = vec![
        PlannedFile::new("app/README.md", readme(ctx)),
        PlannedFile::json("app/spec.json", ctx.spec)?,
        PlannedFile::new(UI_MAP_PATH, ui_map_markdown(ctx.spec)),
    ];

    for view in &ctx.pages {
        plan.push(PlannedFile::new(
            format!("app/pages/{}.md", view.slug),
            page_doc(ctx, &view.page.name, &view.page.purpose),
        ));
    }

    for view in &ctx.entities {
        let doc = json!({
            "name": view.entity.name,
            "title": view.title,
            "fields": fields_json(view.entity),
        });
        plan.push(PlannedFile::json(
            format!("backend/{}.schema.json", view.slug),
            &doc,
        )?);
    }

    Ok(plan)
}

fn readme(ctx: &TemplateContext<'_>) -> String {
    let spec = ctx.spec;
    let mut out = format!("# {}\n\nDomain: {}\n\n## Entities\n\n", spec.name, spec.domain);
    if ctx.entities.is_empty() {
        out.push_str("_No entities declared._\n");
    }
    for view in &ctx.entities {
        out.push_str(&format!(
            "- **{}** (`{}`): {} field(s), detail page at `/entities/{}`\n",
            view.entity.name,
            view.title,
            view.entity.fields.len(),
            view.slug
        ));
    }

    out.push_str("\n## Workflows\n\n");
    if spec.workflows.is_empty() {
        out.push_str("_No workflows declared._\n");
    }
    for workflow in &spec.workflows {
        out.push_str(&format!(
            "- {}: {}\n",
            workflow.name,
            workflow.steps.join(" -> ")
        ));
    }

    out.push_str("\n## Integrations\n\n");
    if spec.integrations.is_empty() {
        out.push_str("_No integrations declared._\n");
    }
    for integration in &spec.integrations {
        out.push_str(&format!("- {}: {}\n", integration.name, integration.purpose));
    }

    out.push_str("\n## Pages\n\n");
    for view in &ctx.pages {
        out.push_str(&format!(
            "- [{}](pages/{}.md): {}\n",
            view.page.name, view.slug, view.page.purpose
        ));
    }

    out.push_str(&format!(
        "\n## Template app\n\nThe runnable template lives under `{}`:\n\n",
        TEMPLATE_ROOT.trim_start_matches("app/")
    ));
    for file in TEMPLATE_FILES {
        out.push_str(&format!("- `{}`\n", file));
    }
    out
}

fn page_doc(ctx: &TemplateContext<'_>, name: &str, purpose: &str) -> String {
    let mut out = format!("# {}\n\n{}\n\n## Data\n\n", name, purpose);
    if ctx.entities.is_empty() {
        out.push_str("- No entities declared\n");
    }
    for view in &ctx.entities {
        let fields = view
            .entity
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("- {}: {}\n", view.entity.name, fields));
    }
    out
}
