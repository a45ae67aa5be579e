//! Section pages and per-entity detail pages.

use serde_json::{json, Value};

use super::{
    column_fields_json, fields_json, js_literal, js_string, sample_record, EntityView,
    TemplateContext,
};
use blueprint_core::slugify;

pub(super) fn dashboard_page(ctx: &TemplateContext<'_>) -> String {
    let first = ctx.first_entity();
    let records = json!([sample_record(first, 1), sample_record(first, 2)]);
    let entity_label = first.map_or("Record", |v| v.entity.name.as_str());

    format!(
        r#"const SAMPLE_RECORDS = {records};

const METRICS = [
  {{ label: 'Entities', value: {entities} }},
  {{ label: 'Workflows', value: {workflows} }},
  {{ label: 'Integrations', value: {integrations} }},
  {{ label: 'Sample records', value: SAMPLE_RECORDS.length }},
];

export default function DashboardPage() {{
  return (
    <section>
      <h1>{{{name}}}</h1>
      <p className="badge">{{{domain}}}</p>
      <div className="grid" style={{{{ marginTop: 24 }}}}>
        {{METRICS.map((metric) => (
          <div key={{metric.label}} className="card">
            <div className="metric">{{metric.value}}</div>
            <div>{{metric.label}}</div>
          </div>
        ))}}
      </div>
      <h2 style={{{{ marginTop: 32 }}}}>{{{entity_label}}} activity</h2>
      <table>
        <thead>
          <tr>
            <th>ID</th>
            <th>Summary</th>
          </tr>
        </thead>
        <tbody>
          {{SAMPLE_RECORDS.map((record) => (
            <tr key={{String(record.id)}}>
              <td>{{String(record.id)}}</td>
              <td>{{JSON.stringify(record)}}</td>
            </tr>
          ))}}
        </tbody>
      </table>
    </section>
  );
}}
"#,
        records = js_literal(&records),
        entities = ctx.entities.len(),
        workflows = ctx.spec.workflows.len(),
        integrations = ctx.spec.integrations.len(),
        name = js_string(&ctx.spec.name),
        domain = js_string(&ctx.spec.domain),
        entity_label = js_string(entity_label),
    )
}

pub(super) fn records_page(ctx: &TemplateContext<'_>) -> String {
    let (entity, fields) = match ctx.first_entity() {
        Some(v) => (v.entity.name.as_str(), fields_json(v.entity)),
        None => ("Record", json!([{ "name": "name", "type": "string", "required": true }])),
    };

    format!(
        r#"'use client';

import {{ useEffect, useState }} from 'react';

const ENTITY = {entity};

const FIELDS = {fields};

type Row = Record<string, unknown>;

export default function RecordsPage() {{
  const [rows, setRows] = useState<Row[]>([]);
  const [error, setError] = useState<string | null>(null);

  useEffect(() => {{
    fetch('/api/records')
      .then((res) => res.json())
      .then((data) => setRows(data.records ?? []))
      .catch((err) => setError(String(err)));
  }}, []);

  return (
    <section>
      <h1>{{ENTITY}} records</h1>
      {{error && <p className="badge">{{error}}</p>}}
      <table>
        <thead>
          <tr>
            {{FIELDS.map((field) => (
              <th key={{field.name}}>{{field.name}}</th>
            ))}}
          </tr>
        </thead>
        <tbody>
          {{rows.map((row, index) => (
            <tr key={{index}}>
              {{FIELDS.map((field) => (
                <td key={{field.name}}>{{String(row[field.name] ?? '')}}</td>
              ))}}
            </tr>
          ))}}
        </tbody>
      </table>
    </section>
  );
}}
"#,
        entity = js_string(entity),
        fields = js_literal(&fields),
    )
}

pub(super) fn entities_page(ctx: &TemplateContext<'_>) -> String {
    let entities: Value = ctx
        .entities
        .iter()
        .map(|v| {
            json!({
                "name": v.entity.name,
                "title": v.title,
                "slug": v.slug,
                "fields": fields_json(v.entity),
            })
        })
        .collect();

    format!(
        r#"import Link from 'next/link';

const ENTITIES = {entities};

export default function EntitiesPage() {{
  return (
    <section>
      <h1>Entities</h1>
      {{ENTITIES.length === 0 && <p>No entities declared.</p>}}
      <div className="grid">
        {{ENTITIES.map((entity) => (
          <div key={{entity.slug}} className="card">
            <h2>
              <Link href={{`/entities/${{entity.slug}}`}} className="accent">
                {{entity.name}}
              </Link>
            </h2>
            <p className="badge">{{entity.title}}</p>
            <ul>
              {{entity.fields.map((field) => (
                <li key={{field.name}}>
                  {{field.name}} ({{field.type}}){{field.required ? ' *' : ''}}
                </li>
              ))}}
            </ul>
          </div>
        ))}}
      </div>
    </section>
  );
}}
"#,
        entities = js_literal(&entities),
    )
}

pub(super) fn workflows_page(ctx: &TemplateContext<'_>) -> String {
    let workflows = serde_json::to_value(&ctx.spec.workflows).unwrap_or_else(|_| json!([]));

    format!(
        r#"const WORKFLOWS = {workflows};

export default function WorkflowsPage() {{
  return (
    <section>
      <h1>Workflows</h1>
      {{WORKFLOWS.length === 0 && <p>No workflows declared.</p>}}
      {{WORKFLOWS.map((workflow) => (
        <div key={{workflow.name}} className="card" style={{{{ marginBottom: 16 }}}}>
          <h2>{{workflow.name}}</h2>
          <ol>
            {{workflow.steps.map((step, index) => (
              <li key={{index}}>{{step}}</li>
            ))}}
          </ol>
        </div>
      ))}}
    </section>
  );
}}
"#,
        workflows = js_literal(&workflows),
    )
}

pub(super) fn integrations_page(ctx: &TemplateContext<'_>) -> String {
    let integrations = serde_json::to_value(&ctx.spec.integrations).unwrap_or_else(|_| json!([]));

    format!(
        r#"const INTEGRATIONS = {integrations};

export default function IntegrationsPage() {{
  return (
    <section>
      <h1>Integrations</h1>
      {{INTEGRATIONS.length === 0 && <p>No integrations declared.</p>}}
      <div className="grid">
        {{INTEGRATIONS.map((integration) => (
          <div key={{integration.name}} className="card">
            <h2>{{integration.name}}</h2>
            <p>{{integration.purpose}}</p>
          </div>
        ))}}
      </div>
    </section>
  );
}}
"#,
        integrations = js_literal(&integrations),
    )
}

pub(super) fn auth_page() -> String {
    r#"const ROLES = [
  {
    role: 'Admin',
    summary: 'Full access, including user management and settings.',
    permissions: ['read', 'create', 'update', 'delete', 'manage-users', 'configure'],
  },
  {
    role: 'Manager',
    summary: 'Approves work and manages records for their team.',
    permissions: ['read', 'create', 'update', 'approve'],
  },
  {
    role: 'Contributor',
    summary: 'Creates and edits records assigned to them.',
    permissions: ['read', 'create', 'update'],
  },
  {
    role: 'Viewer',
    summary: 'Read-only access to dashboards and records.',
    permissions: ['read'],
  },
];

export default function AuthPage() {
  return (
    <section>
      <h1>Access control</h1>
      <p>Role-based access guide for this application.</p>
      <div className="grid" style={{ marginTop: 24 }}>
        {ROLES.map((entry) => (
          <div key={entry.role} className="card">
            <h2>{entry.role}</h2>
            <p>{entry.summary}</p>
            <div>
              {entry.permissions.map((permission) => (
                <span key={permission} className="badge" style={{ marginRight: 4 }}>
                  {permission}
                </span>
              ))}
            </div>
          </div>
        ))}
      </div>
    </section>
  );
}
"#
    .to_string()
}

pub(super) fn settings_page(ctx: &TemplateContext<'_>) -> String {
    let mut vars = vec![
        json!({ "name": "DATABASE_URL", "purpose": "Primary database connection string" }),
        json!({ "name": "AUTH_SECRET", "purpose": "Session signing secret" }),
        json!({ "name": "APP_URL", "purpose": "Public base URL of the deployment" }),
    ];
    for integration in &ctx.spec.integrations {
        let key = slugify(&integration.name).replace('-', "_").to_uppercase();
        if key.is_empty() {
            continue;
        }
        vars.push(json!({
            "name": format!("{}_API_KEY", key),
            "purpose": format!("Credentials for {}", integration.name),
        }));
    }

    format!(
        r#"const ENV_VARS = {vars};

export default function SettingsPage() {{
  return (
    <section>
      <h1>Settings</h1>
      <p>Set these environment variables before deploying.</p>
      <table style={{{{ marginTop: 24 }}}}>
        <thead>
          <tr>
            <th>Variable</th>
            <th>Purpose</th>
            <th>Configured</th>
          </tr>
        </thead>
        <tbody>
          {{ENV_VARS.map((entry) => (
            <tr key={{entry.name}}>
              <td><code>{{entry.name}}</code></td>
              <td>{{entry.purpose}}</td>
              <td><input type="checkbox" aria-label={{entry.name}} /></td>
            </tr>
          ))}}
        </tbody>
      </table>
    </section>
  );
}}
"#,
        vars = js_literal(&Value::Array(vars)),
    )
}

pub(super) fn entity_detail_page(view: &EntityView<'_>) -> String {
    format!(
        r#"'use client';

import {{ useEffect, useState }} from 'react';

const ENTITY = {name};

const FIELDS = {fields};

type Row = Record<string, unknown>;

export default function {title}Page() {{
  const [rows, setRows] = useState<Row[]>([]);
  const [error, setError] = useState<string | null>(null);

  useEffect(() => {{
    fetch('/api/entities/{slug}')
      .then((res) => res.json())
      .then((data) => setRows(data.records ?? []))
      .catch((err) => setError(String(err)));
  }}, []);

  return (
    <section>
      <h1>{{ENTITY}}</h1>
      {{error && <p className="badge">{{error}}</p>}}
      <table>
        <thead>
          <tr>
            <th>id</th>
            {{FIELDS.map((field) => (
              <th key={{field.name}}>{{field.name}}</th>
            ))}}
          </tr>
        </thead>
        <tbody>
          {{rows.map((row) => (
            <tr key={{String(row.id)}}>
              <td>{{String(row.id)}}</td>
              {{FIELDS.map((field) => (
                <td key={{field.name}}>{{String(row[field.name] ?? '')}}</td>
              ))}}
            </tr>
          ))}}
        </tbody>
      </table>
    </section>
  );
}}
"#,
        name = js_string(&view.entity.name),
        fields = js_literal(&column_fields_json(view.entity)),
        title = component_name(&view.title),
        slug = view.slug,
    )
}

/// A valid component identifier: title-cased name, prefixed when it would
/// start with a digit or be empty.
fn component_name(title: &str) -> String {
    match title.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => title.to_string(),
        _ => format!("Entity{}", title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_page_does_not_repeat_declared_id() {
        let spec = blueprint_core::Specification::from_json(
            r#"{"name": "Clinic", "domain": "health", "entities": [
                {"name": "Visit", "fields": [
                    {"name": "id", "type": "string", "required": true},
                    {"name": "patient", "type": "string"}
                ]}
            ]}"#,
        )
        .unwrap();
        let ctx = TemplateContext::new(&spec);
        let page = entity_detail_page(ctx.first_entity().unwrap());
        assert_eq!(page.matches("<th>id</th>").count(), 1);
        assert!(page.contains(r#""name": "patient""#));
        assert!(!page.contains(r#""name": "id""#));
    }

    #[test]
    fn component_name_guards_leading_digit() {
        assert_eq!(component_name("Visit"), "Visit");
        assert_eq!(component_name("2024Report"), "Entity2024Report");
        assert_eq!(component_name(""), "Entity");
    }
}
