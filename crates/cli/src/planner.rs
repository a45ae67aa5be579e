//! Problem statement → build plan and specification.
//!
//! The model answer is untrusted: it is parsed leniently, checked against
//! [`plan_schema`] and deserialized. Any failure along the way, a model
//! error, or the absence of a client yields [`default_plan`].

use blueprint_codegen::{CompletionRequest, ModelClient};
use blueprint_core::{
    parse_lenient, truncate, Entity, Field, FieldType, Specification, Workflow,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const PLANNER_SYSTEM_PROMPT: &str = "You are a product architect. Turn the user's problem \
statement into a build plan for a small web application. Respond with one JSON object with \
the keys summary (a short product name), domain, stack (technologies), plan (ordered step \
names), deliverables, and spec. spec describes the application: name, domain, entities \
(each with name and fields of name, type and required; type is one of string, number, \
boolean, date, text, enum), workflows (name and ordered steps), integrations (name and \
purpose) and pages (name and purpose). No commentary, no Markdown.";

/// The planner's output: build metadata plus the specification driving
/// generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    pub summary: String,
    pub domain: String,
    pub stack: Vec<String>,
    pub plan: Vec<String>,
    pub deliverables: Vec<String>,
    pub spec: Specification,
}

/// JSON schema the planner's answer must satisfy.
pub fn plan_schema() -> Value {
    let strings = json!({ "type": "array", "items": { "type": "string" } });
    let named = |extra: &str| {
        json!({
            "type": "object",
            "properties": { "name": { "type": "string" }, extra: { "type": "string" } },
            "required": ["name", extra]
        })
    };
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string", "minLength": 1 },
            "domain": { "type": "string" },
            "stack": strings,
            "plan": strings,
            "deliverables": strings,
            "spec": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "domain": { "type": "string" },
                    "entities": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "fields": {
                                    "type": "array",
                                    "items": {
                                        "type": "object",
                                        "properties": {
                                            "name": { "type": "string" },
                                            "type": { "type": "string" },
                                            "required": { "type": "boolean" }
                                        },
                                        "required": ["name", "type"]
                                    }
                                }
                            },
                            "required": ["name", "fields"]
                        }
                    },
                    "workflows": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": { "name": { "type": "string" }, "steps": strings },
                            "required": ["name", "steps"]
                        }
                    },
                    "integrations": { "type": "array", "items": named("purpose") },
                    "pages": { "type": "array", "items": named("purpose") }
                },
                "required": ["name", "domain", "entities"]
            }
        },
        "required": ["summary", "domain", "stack", "plan", "deliverables", "spec"]
    })
}

/// Plan `problem`, falling back to [`default_plan`] on any failure.
pub async fn plan_problem(client: Option<&dyn ModelClient>, problem: &str) -> PlanResult {
    let Some(client) = client else {
        tracing::info!("no model configured; using default plan");
        return default_plan(problem);
    };

    let request = CompletionRequest {
        system: PLANNER_SYSTEM_PROMPT.to_string(),
        user: format!("Problem statement:\n{}", problem),
        schema: plan_schema(),
    };
    match client.complete(&request).await {
        Ok(raw) => match parse_plan(&raw) {
            Ok(plan) => {
                tracing::info!(summary = %plan.summary, steps = plan.plan.len(), "plan received");
                plan
            }
            Err(reason) => {
                tracing::warn!(%reason, response = %truncate(&raw, 200), "unusable plan; using default");
                default_plan(problem)
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "planner model call failed; using default plan");
            default_plan(problem)
        }
    }
}

/// Parse and schema-check a raw model answer.
pub fn parse_plan(raw: &str) -> Result<PlanResult, String> {
    let value: Value = parse_lenient(raw).ok_or_else(|| "response is not JSON".to_string())?;
    let validator =
        jsonschema::validator_for(&plan_schema()).map_err(|e| format!("plan schema: {}", e))?;
    let errors: Vec<String> = validator
        .iter_errors(&value)
        .map(|e| format!("{}", e))
        .collect();
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Product-style name from the first words of the problem statement.
fn summary_from(problem: &str) -> String {
    let words: Vec<&str> = problem.split_whitespace().take(6).collect();
    let summary = words
        .iter()
        .map(|w| {
            let mut chars = w.chars().filter(|c| c.is_alphanumeric());
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if summary.is_empty() {
        "Blueprint App".to_string()
    } else {
        summary
    }
}

fn field(name: &str, field_type: FieldType, required: bool) -> Field {
    Field {
        name: name.to_string(),
        field_type,
        required,
    }
}

/// The hardcoded plan used whenever the model is unavailable or unusable.
pub fn default_plan(problem: &str) -> PlanResult {
    let summary = summary_from(problem);
    let domain = "general".to_string();
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    PlanResult {
        spec: Specification {
            name: summary.clone(),
            domain: domain.clone(),
            entities: vec![Entity {
                name: "Item".to_string(),
                fields: vec![
                    field("name", FieldType::String, true),
                    field("status", FieldType::Enum, true),
                    field("owner", FieldType::String, false),
                    field("due", FieldType::Date, false),
                    field("notes", FieldType::Text, false),
                ],
            }],
            workflows: vec![Workflow {
                name: "Review".to_string(),
                steps: strings(&["submit", "review", "approve"]),
            }],
            integrations: Vec::new(),
            pages: Vec::new(),
        },
        summary,
        domain,
        stack: strings(&["Next.js", "TypeScript", "PostgreSQL"]),
        plan: strings(&[
            "Capture requirements",
            "Model data",
            "Generate scaffold",
            "Build template app",
            "Verify workspace",
        ]),
        deliverables: strings(&[
            "Data schema",
            "UI map",
            "Template application",
            "Workspace README",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blueprint_codegen::ModelError;

    struct Fixed(Result<String, String>);

    #[async_trait]
    impl ModelClient for Fixed {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ModelError> {
            self.0.clone().map_err(ModelError::Api)
        }
    }

    const GOOD: &str = r#"Here you go:
    {"summary": "Vendor Audit", "domain": "procurement",
     "stack": ["Next.js"], "plan": ["a", "b", "c"], "deliverables": ["app"],
     "spec": {"name": "Vendor Audit", "domain": "procurement",
              "entities": [{"name": "Vendor", "fields": [{"name": "score", "type": "number"}]}]}}
    Thanks!"#;

    #[tokio::test]
    async fn model_plan_is_used_when_valid() {
        let client = Fixed(Ok(GOOD.to_string()));
        let plan = plan_problem(Some(&client), "audit vendors").await;
        assert_eq!(plan.summary, "Vendor Audit");
        assert_eq!(plan.plan, vec!["a", "b", "c"]);
        assert_eq!(plan.spec.entities[0].fields[0].field_type, FieldType::Number);
    }

    #[tokio::test]
    async fn schema_violation_falls_back() {
        let client = Fixed(Ok(r#"{"summary": "X", "domain": "d"}"#.to_string()));
        let plan = plan_problem(Some(&client), "track field trips").await;
        assert_eq!(plan, default_plan("track field trips"));
    }

    #[tokio::test]
    async fn model_error_falls_back() {
        let client = Fixed(Err("http status: 500".to_string()));
        let plan = plan_problem(Some(&client), "track field trips").await;
        assert_eq!(plan.summary, "Track Field Trips");
    }

    #[tokio::test]
    async fn no_client_uses_default() {
        let plan = plan_problem(None, "").await;
        assert_eq!(plan.summary, "Blueprint App");
        assert_eq!(plan.spec.name, "Blueprint App");
        assert!(plan.spec.pages.is_empty());
    }

    #[test]
    fn default_plan_passes_its_own_schema() {
        let value = serde_json::to_value(default_plan("manage clinic visits")).unwrap();
        let validator = jsonschema::validator_for(&plan_schema()).unwrap();
        assert!(validator.is_valid(&value));
    }

    #[test]
    fn summary_strips_punctuation_and_caps_words() {
        assert_eq!(
            summary_from("we need: a tool, for vendor audits & reviews today"),
            "We Need A Tool For Vendor"
        );
    }
}
