use std::future::Future;

use super::{make_build, TestResult};
use crate::record::{ArtifactKind, RunStatus};
use crate::{BlueprintStorage, StorageError};

pub(super) async fn run_artifact_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "artifact",
            "artifacts_listed_in_append_order",
            artifacts_listed_in_append_order(factory).await,
        ),
        TestResult::from_result(
            "artifact",
            "artifacts_are_scoped_to_run",
            artifacts_are_scoped_to_run(factory).await,
        ),
        TestResult::from_result(
            "artifact",
            "new_run_has_no_artifacts",
            new_run_has_no_artifacts(factory).await,
        ),
        TestResult::from_result(
            "artifact",
            "artifact_for_unknown_run_fails",
            artifact_for_unknown_run_fails(factory).await,
        ),
    ]
}

async fn artifacts_listed_in_append_order<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let build = s
        .create_build(make_build("Clinic", &["a"]))
        .await
        .map_err(|e| e.to_string())?;
    let run = s
        .create_run(&build.id, RunStatus::Running, &build.plan)
        .await
        .map_err(|e| e.to_string())?;

    let expected = [
        (ArtifactKind::Manifest, "/w/manifest.json"),
        (ArtifactKind::Spec, "/w/app-spec.json"),
        (ArtifactKind::Readme, "/w/README.md"),
        (ArtifactKind::Generated, "/w/meta.json"),
        (ArtifactKind::App, "/w/app/template/app/layout.tsx"),
    ];
    for (kind, path) in expected {
        let rec = s
            .append_artifact(&run.id, kind, path)
            .await
            .map_err(|e| e.to_string())?;
        if rec.run_id != run.id || rec.kind != kind || rec.path != path {
            return Err(format!("artifact fields not preserved: {:?}", rec));
        }
    }

    let listed: Vec<(ArtifactKind, String)> = s
        .list_artifacts(&run.id)
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|a| (a.kind, a.path))
        .collect();
    let want: Vec<(ArtifactKind, String)> = expected
        .iter()
        .map(|(k, p)| (*k, p.to_string()))
        .collect();
    if listed != want {
        return Err(format!("expected {:?}, got {:?}", want, listed));
    }
    Ok(())
}

async fn artifacts_are_scoped_to_run<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let build = s
        .create_build(make_build("Clinic", &[]))
        .await
        .map_err(|e| e.to_string())?;
    let one = s
        .create_run(&build.id, RunStatus::Running, &[])
        .await
        .map_err(|e| e.to_string())?;
    let two = s
        .create_run(&build.id, RunStatus::Running, &[])
        .await
        .map_err(|e| e.to_string())?;
    s.append_artifact(&one.id, ArtifactKind::Manifest, "/one/manifest.json")
        .await
        .map_err(|e| e.to_string())?;
    s.append_artifact(&two.id, ArtifactKind::Manifest, "/two/manifest.json")
        .await
        .map_err(|e| e.to_string())?;

    let listed = s.list_artifacts(&two.id).await.map_err(|e| e.to_string())?;
    if listed.len() != 1 || listed[0].path != "/two/manifest.json" {
        return Err(format!("unexpected artifacts for run two: {:?}", listed));
    }
    Ok(())
}

async fn new_run_has_no_artifacts<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let build = s
        .create_build(make_build("Clinic", &[]))
        .await
        .map_err(|e| e.to_string())?;
    let run = s
        .create_run(&build.id, RunStatus::Running, &[])
        .await
        .map_err(|e| e.to_string())?;
    let listed = s.list_artifacts(&run.id).await.map_err(|e| e.to_string())?;
    if !listed.is_empty() {
        return Err(format!("expected no artifacts, got {}", listed.len()));
    }
    Ok(())
}

async fn artifact_for_unknown_run_fails<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s
        .append_artifact("ghost", ArtifactKind::App, "/x")
        .await
    {
        Err(StorageError::RunNotFound { .. }) => {}
        other => return Err(format!("append: expected RunNotFound, got {:?}", other)),
    }
    match s.list_artifacts("ghost").await {
        Err(StorageError::RunNotFound { .. }) => Ok(()),
        other => Err(format!("list: expected RunNotFound, got {:?}", other)),
    }
}
