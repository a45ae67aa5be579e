//! Route handlers for the template app's JSON API.

use serde_json::{json, Value};

use super::{fields_json, js_literal, sample_record, EntityView, TemplateContext};

pub(super) fn records_route(ctx: &TemplateContext<'_>) -> String {
    let first = ctx.first_entity();
    let records = json!([sample_record(first, 1), sample_record(first, 2)]);

    format!(
        r#"import {{ NextResponse }} from 'next/server';

const RECORDS = {records};

export async function GET() {{
  return NextResponse.json({{ records: RECORDS, total: RECORDS.length }});
}}
"#,
        records = js_literal(&records),
    )
}

pub(super) fn entities_route(ctx: &TemplateContext<'_>) -> String {
    let entities: Value = ctx
        .entities
        .iter()
        .map(|v| {
            json!({
                "name": v.entity.name,
                "slug": v.slug,
                "href": format!("/api/entities/{}", v.slug),
                "fields": fields_json(v.entity),
            })
        })
        .collect();

    format!(
        r#"import {{ NextResponse }} from 'next/server';

const ENTITIES = {entities};

export async function GET() {{
  return NextResponse.json({{ entities: ENTITIES }});
}}
"#,
        entities = js_literal(&entities),
    )
}

pub(super) fn workflows_route(ctx: &TemplateContext<'_>) -> String {
    let workflows = serde_json::to_value(&ctx.spec.workflows).unwrap_or_else(|_| json!([]));

    format!(
        r#"import {{ NextResponse }} from 'next/server';

const WORKFLOWS = {workflows};

export async function GET() {{
  return NextResponse.json({{ workflows: WORKFLOWS }});
}}
"#,
        workflows = js_literal(&workflows),
    )
}

pub(super) fn integrations_route(ctx: &TemplateContext<'_>) -> String {
    let integrations = serde_json::to_value(&ctx.spec.integrations).unwrap_or_else(|_| json!([]));

    format!(
        r#"import {{ NextResponse }} from 'next/server';

const INTEGRATIONS = {integrations};

export async function GET() {{
  return NextResponse.json({{ integrations: INTEGRATIONS }});
}}
"#,
        integrations = js_literal(&integrations),
    )
}

/// `GET` lists the seeded records, `POST` echoes a created record with a
/// fresh id.
pub(super) fn entity_list_route(view: &EntityView<'_>) -> String {
    let records = json!([sample_record(Some(view), 1), sample_record(Some(view), 2)]);

    format!(
        r#"import {{ NextResponse }} from 'next/server';

const SAMPLE = {records};

export async function GET() {{
  return NextResponse.json({{ records: SAMPLE, total: SAMPLE.length }});
}}

export async function POST(request: Request) {{
  const body = await request.json().catch(() => ({{}}));
  const record = {{ ...body, id: `{slug}-${{Date.now()}}` }};
  return NextResponse.json({{ record }}, {{ status: 201 }});
}}
"#,
        records = js_literal(&records),
        slug = view.slug,
    )
}

pub(super) fn entity_detail_route(view: &EntityView<'_>) -> String {
    let records = json!([sample_record(Some(view), 1), sample_record(Some(view), 2)]);

    format!(
        r#"import {{ NextResponse }} from 'next/server';

const SAMPLE = {records};

export async function GET(
  _request: Request,
  {{ params }}: {{ params: Promise<{{ id: string }}> }},
) {{
  const {{ id }} = await params;
  const record = SAMPLE.find((entry) => String(entry.id) === id);
  if (!record) {{
    return NextResponse.json({{ error: 'not found' }}, {{ status: 404 }});
  }}
  return NextResponse.json({{ record }});
}}
"#,
        records = js_literal(&records),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::Specification;

    #[test]
    fn entity_routes_embed_slug_and_samples() {
        let spec = Specification::from_json(
            r#"{"name": "Clinic", "domain": "health",
                "entities": [{"name": "Patient Visit", "fields": [{"name": "fee", "type": "number"}]}]}"#,
        )
        .unwrap();
        let ctx = TemplateContext::new(&spec);
        let view = ctx.first_entity().unwrap();

        let list = entity_list_route(view);
        assert!(list.contains("export async function POST"));
        assert!(list.contains("`patient-visit-${Date.now()}`"));
        assert!(list.contains("\"patient-visit-1\""));

        let detail = entity_detail_route(view);
        assert!(detail.contains("status: 404"));
        assert!(detail.contains("\"fee\": 200"));
    }
}
