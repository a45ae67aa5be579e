//! Runs the shared conformance suite against both bundled backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use blueprint_storage::conformance::run_conformance_suite;
use blueprint_storage::{
    ArtifactKind, BlueprintStorage, InMemoryStorage, JsonFileStorage, NewBuild, RunStatus,
    StepStatus,
};

#[tokio::test]
async fn in_memory_backend_conforms() {
    let report = run_conformance_suite(|| async { InMemoryStorage::new() }).await;
    assert!(report.total > 0);
    assert_eq!(report.failed, 0, "{report}");
}

#[tokio::test]
async fn json_file_backend_conforms() {
    let dir = tempfile::tempdir().expect("temp dir");
    let counter = AtomicUsize::new(0);
    let report = run_conformance_suite(|| {
        let path = dir
            .path()
            .join(format!("store-{}.json", counter.fetch_add(1, Ordering::SeqCst)));
        async move { JsonFileStorage::open(path).await.expect("open store") }
    })
    .await;
    assert_eq!(report.failed, 0, "{report}");
}

#[tokio::test]
async fn usable_as_trait_object() {
    let storage: Arc<dyn BlueprintStorage> = Arc::new(InMemoryStorage::new());
    let build = storage
        .create_build(NewBuild {
            problem: "p".into(),
            summary: "s".into(),
            domain: "d".into(),
            plan: vec!["a".into(), "b".into(), "c".into()],
            ..NewBuild::default()
        })
        .await
        .unwrap();
    let run = storage
        .create_run(&build.id, RunStatus::Running, &build.plan)
        .await
        .unwrap();
    storage
        .append_artifact(&run.id, ArtifactKind::Readme, "/w/README.md")
        .await
        .unwrap();
    let settled = storage
        .set_run_status(&run.id, RunStatus::Failed, StepStatus::Failed, Some("boom"))
        .await
        .unwrap();
    assert!(settled.status.is_terminal());
    assert!(settled.steps.iter().all(|s| s.detail.as_deref() == Some("boom")));
    assert_eq!(storage.list_runs(&build.id).await.unwrap().len(), 1);
}
