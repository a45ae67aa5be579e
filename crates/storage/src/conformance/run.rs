use std::future::Future;

use super::{make_build, names, TestResult};
use crate::record::{RunStatus, StepStatus};
use crate::{BlueprintStorage, StorageError};

pub(super) async fn run_run_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "run",
            "create_run_has_pending_steps_in_plan_order",
            create_run_has_pending_steps_in_plan_order(factory).await,
        ),
        TestResult::from_result(
            "run",
            "create_run_with_empty_plan",
            create_run_with_empty_plan(factory).await,
        ),
        TestResult::from_result(
            "run",
            "get_run_returns_created_record",
            get_run_returns_created_record(factory).await,
        ),
        TestResult::from_result(
            "run",
            "list_runs_is_scoped_to_build",
            list_runs_is_scoped_to_build(factory).await,
        ),
        TestResult::from_result(
            "run",
            "create_run_for_unknown_build_fails",
            create_run_for_unknown_build_fails(factory).await,
        ),
        TestResult::from_result(
            "run",
            "get_unknown_run_is_run_not_found",
            get_unknown_run_is_run_not_found(factory).await,
        ),
    ]
}

async fn create_run_has_pending_steps_in_plan_order<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let build = s
        .create_build(make_build("Clinic", &["a", "b", "c"]))
        .await
        .map_err(|e| e.to_string())?;
    let run = s
        .create_run(&build.id, RunStatus::Running, &build.plan)
        .await
        .map_err(|e| e.to_string())?;

    if run.status != RunStatus::Running {
        return Err(format!("expected running, got {}", run.status));
    }
    if run.build_id != build.id {
        return Err(format!("run.build_id {} != {}", run.build_id, build.id));
    }
    let step_names: Vec<&str> = run.steps.iter().map(|s| s.name.as_str()).collect();
    if step_names != ["a", "b", "c"] {
        return Err(format!("expected steps a,b,c, got {:?}", step_names));
    }
    if let Some(step) = run.steps.iter().find(|s| s.status != StepStatus::Pending) {
        return Err(format!("step {} is {}, expected pending", step.name, step.status));
    }
    Ok(())
}

async fn create_run_with_empty_plan<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let build = s
        .create_build(make_build("Empty", &[]))
        .await
        .map_err(|e| e.to_string())?;
    let run = s
        .create_run(&build.id, RunStatus::Running, &[])
        .await
        .map_err(|e| e.to_string())?;
    if !run.steps.is_empty() {
        return Err(format!("expected no steps, got {}", run.steps.len()));
    }
    Ok(())
}

async fn get_run_returns_created_record<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let build = s
        .create_build(make_build("Clinic", &["x"]))
        .await
        .map_err(|e| e.to_string())?;
    let run = s
        .create_run(&build.id, RunStatus::Running, &names(&["x"]))
        .await
        .map_err(|e| e.to_string())?;
    let got = s.get_run(&run.id).await.map_err(|e| e.to_string())?;
    if got != run {
        return Err(format!("expected {:?}, got {:?}", run, got));
    }
    Ok(())
}

async fn list_runs_is_scoped_to_build<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let one = s
        .create_build(make_build("One", &[]))
        .await
        .map_err(|e| e.to_string())?;
    let two = s
        .create_build(make_build("Two", &[]))
        .await
        .map_err(|e| e.to_string())?;

    let r1 = s
        .create_run(&one.id, RunStatus::Running, &[])
        .await
        .map_err(|e| e.to_string())?;
    s.create_run(&two.id, RunStatus::Running, &[])
        .await
        .map_err(|e| e.to_string())?;
    let r3 = s
        .create_run(&one.id, RunStatus::Running, &[])
        .await
        .map_err(|e| e.to_string())?;

    let listed: Vec<String> = s
        .list_runs(&one.id)
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|r| r.id)
        .collect();
    if listed != vec![r1.id, r3.id] {
        return Err(format!("unexpected runs for build one: {:?}", listed));
    }
    Ok(())
}

async fn create_run_for_unknown_build_fails<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.create_run("ghost", RunStatus::Running, &names(&["a"])).await {
        Err(StorageError::BuildNotFound { .. }) => {}
        other => return Err(format!("expected BuildNotFound, got {:?}", other)),
    }
    match s.list_runs("ghost").await {
        Err(StorageError::BuildNotFound { .. }) => Ok(()),
        other => Err(format!("list_runs: expected BuildNotFound, got {:?}", other)),
    }
}

async fn get_unknown_run_is_run_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.get_run("ghost-run").await {
        Err(StorageError::RunNotFound { run_id }) if run_id == "ghost-run" => Ok(()),
        other => Err(format!("expected RunNotFound, got {:?}", other)),
    }
}
