//! Navigation shell and global styling.

use serde_json::{json, Value};

use super::theme::palette_declarations;
use super::{js_literal, js_string, TemplateContext};

/// Fixed navigation sections, in display order.
const SECTIONS: [(&str, &str); 7] = [
    ("/", "Dashboard"),
    ("/records", "Records"),
    ("/entities", "Entities"),
    ("/workflows", "Workflows"),
    ("/integrations", "Integrations"),
    ("/auth", "Access"),
    ("/settings", "Settings"),
];

pub(super) fn layout_tsx(ctx: &TemplateContext<'_>) -> String {
    let nav: Value = SECTIONS
        .iter()
        .map(|(href, label)| json!({ "href": href, "label": label }))
        .collect();
    let entity_nav: Value = ctx
        .entities
        .iter()
        .map(|v| json!({ "href": format!("/entities/{}", v.slug), "label": v.entity.name }))
        .collect();

    format!(
        r#"import './globals.css';
import Link from 'next/link';
import type {{ ReactNode }} from 'react';

const APP_NAME = {name};

const NAV = {nav};

const ENTITY_NAV = {entity_nav};

export const metadata = {{
  title: APP_NAME,
  description: {domain},
}};

export default function RootLayout({{ children }}: {{ children: ReactNode }}) {{
  return (
    <html lang="en">
      <body>
        <div className="shell">
          <aside className="sidebar">
            <div className="brand">{{APP_NAME}}</div>
            <nav>
              {{NAV.map((item) => (
                <Link key={{item.href}} href={{item.href}} className="nav-link">
                  {{item.label}}
                </Link>
              ))}}
            </nav>
            {{ENTITY_NAV.length > 0 && (
              <nav className="sub-nav">
                {{ENTITY_NAV.map((item) => (
                  <Link key={{item.href}} href={{item.href}} className="nav-link nav-link-sub">
                    {{item.label}}
                  </Link>
                ))}}
              </nav>
            )}}
          </aside>
          <main className="content">{{children}}</main>
        </div>
      </body>
    </html>
  );
}}
"#,
        name = js_string(&ctx.spec.name),
        domain = js_string(&ctx.spec.domain),
        nav = js_literal(&nav),
        entity_nav = js_literal(&entity_nav),
    )
}

pub(super) fn globals_css(ctx: &TemplateContext<'_>) -> String {
    format!(
        r#":root {{
{palette}  --background: #f8fafc;
  --surface: #ffffff;
  --border: #e2e8f0;
  --text: #0f172a;
  --text-muted: #64748b;
}}

*, *::before, *::after {{
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}}

body {{
  font-family: system-ui, -apple-system, 'Segoe UI', Roboto, sans-serif;
  color: var(--text);
  background: var(--background);
  line-height: 1.5;
}}

.shell {{
  display: flex;
  min-height: 100vh;
}}

.sidebar {{
  width: 240px;
  flex-shrink: 0;
  background: var(--surface);
  border-right: 1px solid var(--border);
  padding: 24px 16px;
}}

.brand {{
  font-weight: 700;
  color: var(--primary-dark);
  margin-bottom: 24px;
}}

.nav-link {{
  display: block;
  padding: 8px 12px;
  border-radius: 6px;
  color: var(--text);
  text-decoration: none;
}}

.nav-link:hover {{
  background: var(--primary-light);
  color: var(--primary);
}}

.sub-nav {{
  margin-top: 16px;
  padding-top: 16px;
  border-top: 1px solid var(--border);
}}

.nav-link-sub {{
  font-size: 14px;
  color: var(--text-muted);
}}

.content {{
  flex: 1;
  padding: 32px;
  max-width: 1200px;
}}

.grid {{
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
  gap: 16px;
}}

.card {{
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 20px;
  box-shadow: 0 1px 2px rgba(0, 0, 0, 0.05);
}}

.metric {{
  font-size: 32px;
  font-weight: 700;
  color: var(--primary);
}}

.badge {{
  display: inline-block;
  padding: 2px 8px;
  border-radius: 9999px;
  background: var(--primary-light);
  color: var(--primary-dark);
  font-size: 12px;
}}

table {{
  width: 100%;
  border-collapse: collapse;
  background: var(--surface);
}}

th, td {{
  text-align: left;
  padding: 8px 12px;
  border-bottom: 1px solid var(--border);
}}

th {{
  color: var(--text-muted);
  font-weight: 600;
}}

a.accent {{
  color: var(--accent);
}}

@media (max-width: 768px) {{
  .shell {{ flex-direction: column; }}
  .sidebar {{ width: 100%; border-right: none; border-bottom: 1px solid var(--border); }}
  .content {{ padding: 16px; }}
}}
"#,
        palette = palette_declarations(&ctx.spec.name),
    )
}
