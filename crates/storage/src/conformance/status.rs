use std::future::Future;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::{make_build, TestResult};
use crate::record::{RunStatus, StepStatus};
use crate::{BlueprintStorage, StorageError};

pub(super) async fn run_status_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "status",
            "ready_completes_every_step",
            settle_sets_every_step(factory, RunStatus::Ready, StepStatus::Completed).await,
        ),
        TestResult::from_result(
            "status",
            "failed_fails_every_step",
            settle_sets_every_step(factory, RunStatus::Failed, StepStatus::Failed).await,
        ),
        TestResult::from_result(
            "status",
            "status_visible_via_get_run",
            status_visible_via_get_run(factory).await,
        ),
        TestResult::from_result(
            "status",
            "status_update_leaves_other_runs_alone",
            status_update_leaves_other_runs_alone(factory).await,
        ),
        TestResult::from_result(
            "status",
            "settle_records_detail_and_timestamps",
            settle_records_detail_and_timestamps(factory).await,
        ),
        TestResult::from_result(
            "status",
            "status_of_unknown_run_is_run_not_found",
            status_of_unknown_run_is_run_not_found(factory).await,
        ),
    ]
}

async fn settle_sets_every_step<S, F, Fut>(
    factory: &F,
    status: RunStatus,
    step_status: StepStatus,
) -> Result<(), String>
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
    let updated = s
        .set_run_status(&run.id, status, step_status, None)
        .await
        .map_err(|e| e.to_string())?;

    if updated.status != status {
        return Err(format!("expected {}, got {}", status, updated.status));
    }
    if updated.steps.len() != 3 {
        return Err(format!("expected 3 steps, got {}", updated.steps.len()));
    }
    if let Some(step) = updated.steps.iter().find(|s| s.status != step_status) {
        return Err(format!("step {} is {}, expected {}", step.name, step.status, step_status));
    }
    let ids: Vec<&str> = updated.steps.iter().map(|s| s.id.as_str()).collect();
    let before: Vec<&str> = run.steps.iter().map(|s| s.id.as_str()).collect();
    if ids != before {
        return Err("step ids changed on status update".into());
    }
    Ok(())
}

async fn status_visible_via_get_run<S, F, Fut>(factory: &F) -> Result<(), String>
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
    s.set_run_status(&run.id, RunStatus::Failed, StepStatus::Failed, Some("verify failed"))
        .await
        .map_err(|e| e.to_string())?;
    let got = s.get_run(&run.id).await.map_err(|e| e.to_string())?;
    if got.status != RunStatus::Failed || got.steps[0].status != StepStatus::Failed {
        return Err(format!("update not visible: {:?}", got));
    }
    Ok(())
}

async fn status_update_leaves_other_runs_alone<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let build = s
        .create_build(make_build("Clinic", &["a", "b"]))
        .await
        .map_err(|e| e.to_string())?;
    let first = s
        .create_run(&build.id, RunStatus::Running, &build.plan)
        .await
        .map_err(|e| e.to_string())?;
    let second = s
        .create_run(&build.id, RunStatus::Running, &build.plan)
        .await
        .map_err(|e| e.to_string())?;
    s.set_run_status(&first.id, RunStatus::Ready, StepStatus::Completed, None)
        .await
        .map_err(|e| e.to_string())?;

    let untouched = s.get_run(&second.id).await.map_err(|e| e.to_string())?;
    if untouched.status != RunStatus::Running
        || untouched.steps.iter().any(|s| s.status != StepStatus::Pending)
    {
        return Err(format!("second run was modified: {:?}", untouched));
    }
    Ok(())
}

fn parse_ts(ts: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(ts, &Rfc3339).map_err(|e| format!("bad timestamp {:?}: {}", ts, e))
}

async fn settle_records_detail_and_timestamps<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let build = s
        .create_build(make_build("Clinic", &["a", "b"]))
        .await
        .map_err(|e| e.to_string())?;
    let run = s
        .create_run(&build.id, RunStatus::Running, &build.plan)
        .await
        .map_err(|e| e.to_string())?;
    let settled = s
        .set_run_status(&run.id, RunStatus::Failed, StepStatus::Failed, Some("verify failed"))
        .await
        .map_err(|e| e.to_string())?;

    for (before, after) in run.steps.iter().zip(&settled.steps) {
        if after.run_id != run.id {
            return Err(format!("step {} belongs to {}", after.name, after.run_id));
        }
        if after.detail.as_deref() != Some("verify failed") {
            return Err(format!("step {} detail is {:?}", after.name, after.detail));
        }
        if after.created_at != before.created_at {
            return Err(format!("step {} created_at changed", after.name));
        }
        if parse_ts(&after.updated_at)? < parse_ts(&before.updated_at)? {
            return Err(format!("step {} updated_at went backwards", after.name));
        }
        if after.updated_at != settled.updated_at {
            return Err(format!("step {} updated_at not bumped with the run", after.name));
        }
    }

    let touched = s.get_build(&build.id).await.map_err(|e| e.to_string())?;
    if touched.created_at != build.created_at {
        return Err("build created_at changed".into());
    }
    if touched.updated_at != settled.updated_at {
        return Err(format!(
            "build updated_at {} does not match settle time {}",
            touched.updated_at, settled.updated_at
        ));
    }
    Ok(())
}

async fn status_of_unknown_run_is_run_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s
        .set_run_status("ghost", RunStatus::Ready, StepStatus::Completed, None)
        .await
    {
        Err(StorageError::RunNotFound { .. }) => Ok(()),
        other => Err(format!("expected RunNotFound, got {:?}", other)),
    }
}
