use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use blueprint_core::Specification;

use crate::planner::PlanResult;

/// What a generated workspace offers, recorded in every manifest.
pub const CAPABILITIES: [&str; 5] = [
    "static-scaffold",
    "template-app",
    "entity-api-stubs",
    "llm-codegen",
    "verification",
];

/// Compute SHA-256 etag from compact JSON representation.
pub fn compute_etag(body: &Value) -> String {
    let canonical = body.to_string();
    let hash = Sha256::digest(canonical.as_bytes());
    format!("{:x}", hash)
}

/// The run manifest written to `manifest.json`.
///
/// Keys keep insertion order (`serde_json` is built with `preserve_order`);
/// the body is always assembled in the same order, so the etag is stable
/// for equal content.
pub fn build_manifest(
    build_id: &str,
    run_id: &str,
    problem: &str,
    plan: &PlanResult,
    generated_at: &str,
) -> Value {
    let body = json!({
        "build_id": build_id,
        "run_id": run_id,
        "problem": problem,
        "summary": plan.summary,
        "domain": plan.domain,
        "stack": plan.stack,
        "plan": plan.plan,
        "deliverables": plan.deliverables,
        "capabilities": CAPABILITIES,
        "spec": plan.spec,
        "generated_at": generated_at,
    });
    let etag = compute_etag(&body);
    let mut map = Map::new();
    map.insert("manifest".to_string(), body);
    map.insert("etag".to_string(), Value::String(etag));
    Value::Object(map)
}

/// The specification plus deployment constraints and acceptance criteria,
/// written to `app-spec.json`.
pub fn expanded_spec(spec: &Specification) -> Value {
    json!({
        "spec": spec,
        "constraints": {
            "deployment": "Single Next.js app deployable to a Node 20 runtime",
            "auth": "Role-based access with Admin, Manager, Contributor and Viewer roles",
            "database": "PostgreSQL with one table per entity",
        },
        "acceptance_criteria": [
            "Every entity has list and detail API routes",
            "Every page in the navigation renders without a server error",
            "Workflows are listed with their ordered steps",
            "Required environment variables are documented in settings",
        ],
    })
}

/// Workspace README generated from the plan.
pub fn readme(plan: &PlanResult, problem: &str) -> String {
    let mut out = format!("# {}\n\n", plan.summary);
    out.push_str(&format!("Domain: {}\n\n", plan.domain));
    out.push_str("## Problem\n\n");
    out.push_str(problem.trim());
    out.push_str("\n\n## Stack\n\n");
    for item in &plan.stack {
        out.push_str(&format!("- {}\n", item));
    }
    out.push_str("\n## Plan\n\n");
    for (i, step) in plan.plan.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, step));
    }
    out.push_str("\n## Deliverables\n\n");
    for item in &plan.deliverables {
        out.push_str(&format!("- {}\n", item));
    }
    out.push_str("\n## Layout\n\n");
    out.push_str("- `app/template/app/`: template application\n");
    out.push_str("- `app/`: UI map, page notes and specification\n");
    out.push_str("- `backend/`: data schemas and workflows\n");
    out.push_str("- `infra/`: integrations\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::default_plan;

    #[test]
    fn etag_is_sha256_of_compact_body() {
        let plan = default_plan("track vendor audits");
        let manifest = build_manifest("b1", "r1", "track vendor audits", &plan, "2026-01-01T00:00:00Z");
        let etag = manifest["etag"].as_str().unwrap();
        assert_eq!(etag.len(), 64);
        assert_eq!(etag, compute_etag(&manifest["manifest"]));
    }

    #[test]
    fn manifest_carries_identifiers_and_spec() {
        let plan = default_plan("track vendor audits");
        let manifest = build_manifest("b1", "r1", "track vendor audits", &plan, "now");
        let body = &manifest["manifest"];
        assert_eq!(body["build_id"], "b1");
        assert_eq!(body["run_id"], "r1");
        assert_eq!(body["spec"]["entities"][0]["name"], "Item");
        assert_eq!(body["capabilities"].as_array().unwrap().len(), CAPABILITIES.len());
    }

    #[test]
    fn etag_changes_with_content() {
        let plan = default_plan("x");
        let a = build_manifest("b1", "r1", "x", &plan, "t");
        let b = build_manifest("b1", "r2", "x", &plan, "t");
        assert_ne!(a["etag"], b["etag"]);
    }

    #[test]
    fn readme_numbers_plan_steps() {
        let plan = default_plan("x");
        let text = readme(&plan, "  x  ");
        assert!(text.starts_with("# X\n"));
        assert!(text.contains("1. Capture requirements\n"));
        assert!(text.contains("5. Verify workspace\n"));
    }

    #[test]
    fn expanded_spec_adds_constraints() {
        let plan = default_plan("x");
        let value = expanded_spec(&plan.spec);
        assert!(value["constraints"]["database"].is_string());
        assert_eq!(value["spec"]["name"], "X");
    }
}
