//! Integration tests for the generators: determinism, completeness of the
//! template tree, syntactic validity of emitted files, and the codegen
//! engine's retry bound.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use blueprint_codegen::{
    codegen_targets, generate_scaffold, generate_template_app, CodegenEngine, CompletionRequest,
    ModelClient, ModelError, MAX_ATTEMPTS, TEMPLATE_FILES, TEMPLATE_ROOT,
};
use blueprint_core::{validate_content, Specification};

fn clinic_spec() -> Specification {
    Specification::from_json(
        r#"{
            "name": "Clinic Scheduler",
            "domain": "healthcare",
            "entities": [
                {"name": "Patient", "fields": [
                    {"name": "name", "type": "string", "required": true},
                    {"name": "born", "type": "date"},
                    {"name": "notes", "type": "text"}
                ]},
                {"name": "Appointment", "fields": [
                    {"name": "when", "type": "date", "required": true},
                    {"name": "fee", "type": "number"},
                    {"name": "status", "type": "enum"},
                    {"name": "it's \"quoted\" {odd}", "type": "string"}
                ]}
            ],
            "workflows": [{"name": "Booking", "steps": ["request", "confirm", "remind"]}],
            "integrations": [{"name": "Twilio SMS", "purpose": "appointment reminders"}]
        }"#,
    )
    .expect("valid spec")
}

fn read_tree(root: &Path, paths: &[std::path::PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .map(|p| {
            let rel = p.strip_prefix(root).expect("under root").display().to_string();
            (rel, fs::read_to_string(p).expect("readable"))
        })
        .collect()
}

#[test]
fn generators_are_deterministic() {
    let spec = clinic_spec();
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();

    let mut written_a = generate_scaffold(a.path(), &spec).unwrap();
    written_a.extend(generate_template_app(a.path(), &spec).unwrap());
    let mut written_b = generate_scaffold(b.path(), &spec).unwrap();
    written_b.extend(generate_template_app(b.path(), &spec).unwrap());

    assert_eq!(read_tree(a.path(), &written_a), read_tree(b.path(), &written_b));
}

#[test]
fn template_app_is_complete_and_on_disk() {
    let spec = clinic_spec();
    let dir = tempfile::tempdir().unwrap();
    let written = generate_template_app(dir.path(), &spec).unwrap();

    let n = spec.entities.len();
    let pages = spec.effective_pages().len();
    assert_eq!(pages, 2, "no declared pages falls back to the default pair");
    assert_eq!(written.len(), (3 + pages + n) + (TEMPLATE_FILES.len() + 3 * n));

    for path in &written {
        assert!(path.is_file(), "missing {}", path.display());
    }
    for rel in TEMPLATE_FILES {
        assert!(dir.path().join(TEMPLATE_ROOT).join(rel).is_file(), "missing {}", rel);
    }
    assert!(dir.path().join("app/pages/dashboard.md").is_file());
    assert!(dir.path().join("app/pages/items.md").is_file());
    assert!(dir
        .path()
        .join("app/template/app/api/entities/appointment/[id]/route.ts")
        .is_file());
}

#[test]
fn emitted_code_passes_the_content_validator() {
    let spec = clinic_spec();
    let dir = tempfile::tempdir().unwrap();
    let mut written = generate_scaffold(dir.path(), &spec).unwrap();
    written.extend(generate_template_app(dir.path(), &spec).unwrap());

    for path in written {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !matches!(ext, "json" | "ts" | "tsx" | "css") {
            continue;
        }
        let content = fs::read_to_string(&path).unwrap();
        if let Err(e) = validate_content(&content, ext) {
            panic!("{} failed validation: {}", path.display(), e);
        }
    }
}

#[test]
fn scaffold_and_template_agree_on_ui_map() {
    let spec = clinic_spec();
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    generate_scaffold(a.path(), &spec).unwrap();
    generate_template_app(b.path(), &spec).unwrap();
    assert_eq!(
        fs::read_to_string(a.path().join("app/ui-map.md")).unwrap(),
        fs::read_to_string(b.path().join("app/ui-map.md")).unwrap()
    );
}

/// Always answers with content that is not valid JSON.
struct BrokenJson {
    calls: AtomicUsize,
}

#[async_trait]
impl ModelClient for BrokenJson {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(r#"{"path": "app/template/package.json", "content": "{\"name\": "}"#.to_string())
    }
}

#[tokio::test]
async fn invalid_json_target_is_retried_once_and_still_written() {
    let spec = clinic_spec();
    let dir = tempfile::tempdir().unwrap();
    let client = Arc::new(BrokenJson {
        calls: AtomicUsize::new(0),
    });
    let engine = CodegenEngine::new(client.clone(), dir.path());

    let outcomes = engine.generate_matching(&spec, "package.json").await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(client.calls.load(Ordering::SeqCst), MAX_ATTEMPTS as usize);
    assert_eq!(outcomes[0].attempts, 2);
    assert!(outcomes[0].validation_error.is_some());
    let written = dir.path().join("app/template/package.json");
    assert_eq!(fs::read_to_string(written).unwrap(), "{\"name\": ");
}

#[tokio::test]
async fn generate_all_covers_every_target() {
    struct Echo;

    #[async_trait]
    impl ModelClient for Echo {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
            let content = if request.user.contains("Target file: app/template/package.json") {
                "{\"name\": \"clinic\"}"
            } else {
                "export default function Generated() { return null; }"
            };
            Ok(serde_json::json!({ "path": "ignored", "content": content }).to_string())
        }
    }

    let spec = clinic_spec();
    let dir = tempfile::tempdir().unwrap();
    let engine = CodegenEngine::new(Arc::new(Echo), dir.path());
    let outcomes = engine.generate_all(&spec).await.unwrap();

    let targets = codegen_targets(&spec);
    assert_eq!(outcomes.len(), targets.len());
    for (outcome, target) in outcomes.iter().zip(&targets) {
        assert!(outcome.is_valid(), "{} invalid", target.path);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.path, dir.path().join(&target.path));
    }
}
