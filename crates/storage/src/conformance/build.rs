use std::future::Future;

use super::{make_build, TestResult};
use crate::{BlueprintStorage, StorageError};

pub(super) async fn run_build_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "build",
            "create_build_assigns_id_and_keeps_fields",
            create_build_assigns_id_and_keeps_fields(factory).await,
        ),
        TestResult::from_result(
            "build",
            "get_build_returns_created_record",
            get_build_returns_created_record(factory).await,
        ),
        TestResult::from_result(
            "build",
            "list_builds_in_creation_order",
            list_builds_in_creation_order(factory).await,
        ),
        TestResult::from_result(
            "build",
            "get_unknown_build_is_build_not_found",
            get_unknown_build_is_build_not_found(factory).await,
        ),
    ]
}

async fn create_build_assigns_id_and_keeps_fields<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let input = make_build("Vendor Audit", &["plan", "build"]);
    let rec = s
        .create_build(input.clone())
        .await
        .map_err(|e| e.to_string())?;
    if rec.id.is_empty() {
        return Err("build id is empty".into());
    }
    if rec.summary != input.summary || rec.problem != input.problem || rec.plan != input.plan {
        return Err(format!("fields not preserved: {:?}", rec));
    }
    if rec.created_at.is_empty() {
        return Err("created_at is empty".into());
    }
    Ok(())
}

async fn get_build_returns_created_record<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s
        .create_build(make_build("Clinic", &["a"]))
        .await
        .map_err(|e| e.to_string())?;
    let got = s.get_build(&rec.id).await.map_err(|e| e.to_string())?;
    if got != rec {
        return Err(format!("expected {:?}, got {:?}", rec, got));
    }
    Ok(())
}

async fn list_builds_in_creation_order<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let mut ids = Vec::new();
    for summary in ["first", "second", "third"] {
        let rec = s
            .create_build(make_build(summary, &[]))
            .await
            .map_err(|e| e.to_string())?;
        ids.push(rec.id);
    }
    let listed: Vec<String> = s
        .list_builds()
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|b| b.id)
        .collect();
    if listed != ids {
        return Err(format!("expected {:?}, got {:?}", ids, listed));
    }
    Ok(())
}

async fn get_unknown_build_is_build_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.get_build("no-such-build").await {
        Err(StorageError::BuildNotFound { build_id }) if build_id == "no-such-build" => Ok(()),
        other => Err(format!("expected BuildNotFound, got {:?}", other)),
    }
}
