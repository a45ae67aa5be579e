//! The run orchestrator: one planned build in, one verified workspace out.
//!
//! A run is created `running` with one `pending` step per plan entry. The
//! pipeline then creates the workspace, writes the manifest, the expanded
//! specification and the README, runs the static scaffold and template app
//! generators, checks that every recorded artifact exists, and runs the
//! verification gate. Success marks the run `ready` and all steps
//! `completed`; any failure marks both `failed` and returns the original
//! error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use blueprint_codegen::{generate_scaffold, generate_template_app, CodegenError, ModelClient};
use blueprint_core::{slugify, Specification};
use blueprint_storage::{
    now_rfc3339, ArtifactKind, BlueprintStorage, NewBuild, RunStatus, StepStatus, StorageError,
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::manifest::{build_manifest, expanded_spec, readme};
use crate::planner::{plan_problem, PlanResult};
use crate::verify::{Verifier, VerifyError};

/// Top-level directories created in every workspace.
pub const WORKSPACE_DIRS: [&str; 3] = ["app", "backend", "infra"];

pub const MANIFEST_FILE: &str = "manifest.json";
pub const APP_SPEC_FILE: &str = "app-spec.json";
pub const README_FILE: &str = "README.md";

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("failed to create workspace '{path}': {source}", path = .path.display())]
    Workspace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}", path = .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("missing artifacts: {}", .paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    MissingArtifacts { paths: Vec<PathBuf> },

    #[error("background task failed: {0}")]
    Task(String),

    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub build_id: String,
    pub run_id: String,
    pub manifest_path: PathBuf,
    pub workspace: PathBuf,
}

pub struct Orchestrator {
    storage: Arc<dyn BlueprintStorage>,
    verifier: Arc<dyn Verifier>,
    workspace_root: PathBuf,
}

impl Orchestrator {
    pub fn new(
        storage: Arc<dyn BlueprintStorage>,
        verifier: Arc<dyn Verifier>,
        workspace_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage,
            verifier,
            workspace_root: workspace_root.into(),
        }
    }

    pub fn storage(&self) -> &Arc<dyn BlueprintStorage> {
        &self.storage
    }

    /// Plan `problem`, store the build and run it.
    pub async fn submit(
        &self,
        client: Option<&dyn ModelClient>,
        problem: &str,
    ) -> Result<RunOutcome, OrchestratorError> {
        let plan = plan_problem(client, problem).await;
        let build = self
            .storage
            .create_build(NewBuild {
                problem: problem.to_string(),
                summary: plan.summary.clone(),
                domain: plan.domain.clone(),
                stack: plan.stack.clone(),
                plan: plan.plan.clone(),
                deliverables: plan.deliverables.clone(),
            })
            .await?;
        tracing::info!(build_id = %build.id, summary = %build.summary, "build created");
        self.run(&build.id, problem, &plan).await
    }

    /// Execute one run for an existing build.
    pub async fn run(
        &self,
        build_id: &str,
        problem: &str,
        plan: &PlanResult,
    ) -> Result<RunOutcome, OrchestratorError> {
        let run = self
            .storage
            .create_run(build_id, RunStatus::Running, &plan.plan)
            .await?;
        tracing::info!(build_id, run_id = %run.id, steps = run.steps.len(), "run started");

        match self.execute(build_id, &run.id, problem, plan).await {
            Ok(outcome) => {
                self.storage
                    .set_run_status(&run.id, RunStatus::Ready, StepStatus::Completed, None)
                    .await?;
                tracing::info!(run_id = %run.id, workspace = %outcome.workspace.display(), "run ready");
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(run_id = %run.id, error = %err, "run failed");
                let detail = err.to_string();
                if let Err(status_err) = self
                    .storage
                    .set_run_status(&run.id, RunStatus::Failed, StepStatus::Failed, Some(&detail))
                    .await
                {
                    tracing::error!(run_id = %run.id, error = %status_err, "failed to record run failure");
                }
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        build_id: &str,
        run_id: &str,
        problem: &str,
        plan: &PlanResult,
    ) -> Result<RunOutcome, OrchestratorError> {
        let workspace = self.create_workspace(build_id, &plan.summary).await?;
        let mut recorded = Vec::new();

        let manifest = build_manifest(build_id, run_id, problem, plan, &now_rfc3339());
        let manifest_path = workspace.join(MANIFEST_FILE);
        self.write_artifact(run_id, ArtifactKind::Manifest, &manifest_path, &pretty(&manifest, "manifest")?)
            .await?;
        recorded.push(manifest_path.clone());

        let spec_path = workspace.join(APP_SPEC_FILE);
        let spec_text = pretty(&expanded_spec(&plan.spec), "expanded specification")?;
        self.write_artifact(run_id, ArtifactKind::Spec, &spec_path, &spec_text)
            .await?;
        recorded.push(spec_path);

        let readme_path = workspace.join(README_FILE);
        self.write_artifact(run_id, ArtifactKind::Readme, &readme_path, &readme(plan, problem))
            .await?;
        recorded.push(readme_path);

        let (scaffold, app) = write_generated(workspace.clone(), plan.spec.clone()).await?;
        for path in scaffold {
            self.record(run_id, ArtifactKind::Generated, &path).await?;
            recorded.push(path);
        }
        for path in app {
            self.record(run_id, ArtifactKind::App, &path).await?;
            recorded.push(path);
        }
        tracing::debug!(run_id, artifacts = recorded.len(), "artifacts recorded");

        let missing = missing_artifacts(recorded).await?;
        if !missing.is_empty() {
            return Err(OrchestratorError::MissingArtifacts { paths: missing });
        }

        self.verifier.verify(&workspace).await?;

        Ok(RunOutcome {
            build_id: build_id.to_string(),
            run_id: run_id.to_string(),
            manifest_path,
            workspace,
        })
    }

    /// `{root}/{slug(summary)}`, or `{root}/{build_id}` when the summary has
    /// no slug. Returned canonicalized.
    async fn create_workspace(
        &self,
        build_id: &str,
        summary: &str,
    ) -> Result<PathBuf, OrchestratorError> {
        let dir = self.workspace_root.join(workspace_folder(build_id, summary));
        for sub in WORKSPACE_DIRS {
            let path = dir.join(sub);
            tokio::fs::create_dir_all(&path)
                .await
                .map_err(|source| OrchestratorError::Workspace { path, source })?;
        }
        tokio::fs::canonicalize(&dir)
            .await
            .map_err(|source| OrchestratorError::Workspace { path: dir, source })
    }

    async fn write_artifact(
        &self,
        run_id: &str,
        kind: ArtifactKind,
        path: &Path,
        content: &str,
    ) -> Result<(), OrchestratorError> {
        tokio::fs::write(path, content)
            .await
            .map_err(|source| OrchestratorError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        self.record(run_id, kind, path).await
    }

    async fn record(
        &self,
        run_id: &str,
        kind: ArtifactKind,
        path: &Path,
    ) -> Result<(), OrchestratorError> {
        self.storage
            .append_artifact(run_id, kind, &path.display().to_string())
            .await?;
        Ok(())
    }
}

/// Workspace folder name for a build.
pub fn workspace_folder(build_id: &str, summary: &str) -> String {
    let slug = slugify(summary);
    if slug.is_empty() {
        build_id.to_string()
    } else {
        slug
    }
}

fn pretty(value: &serde_json::Value, what: &'static str) -> Result<String, OrchestratorError> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|source| OrchestratorError::Serialize { what, source })?;
    text.push('\n');
    Ok(text)
}

/// Write the static scaffold and template app on the blocking pool; both
/// generators use `std::fs`.
async fn write_generated(
    workspace: PathBuf,
    spec: Specification,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), OrchestratorError> {
    let written = tokio::task::spawn_blocking(move || {
        let scaffold = generate_scaffold(&workspace, &spec)?;
        let app = generate_template_app(&workspace, &spec)?;
        Ok::<_, CodegenError>((scaffold, app))
    })
    .await
    .map_err(|e| OrchestratorError::Task(e.to_string()))??;
    Ok(written)
}

/// Stat every path concurrently; return the missing ones in input order.
pub async fn missing_artifacts(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>, OrchestratorError> {
    let mut checks = JoinSet::new();
    for (index, path) in paths.into_iter().enumerate() {
        checks.spawn(async move {
            let exists = tokio::fs::try_exists(&path).await.unwrap_or(false);
            (index, path, exists)
        });
    }

    let mut missing = Vec::new();
    while let Some(joined) = checks.join_next().await {
        let (index, path, exists) = joined.map_err(|e| OrchestratorError::Task(e.to_string()))?;
        if !exists {
            missing.push((index, path));
        }
    }
    missing.sort_by_key(|(index, _)| *index);
    Ok(missing.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::default_plan;
    use crate::verify::TemplateFilesVerifier;
    use async_trait::async_trait;
    use blueprint_storage::InMemoryStorage;

    struct Rejecting;

    #[async_trait]
    impl Verifier for Rejecting {
        async fn verify(&self, _workspace: &Path) -> Result<(), VerifyError> {
            Err(VerifyError::Failed {
                program: "check".into(),
                code: Some(2),
                stderr: "type errors".into(),
            })
        }
    }

    fn plan_abc(summary: &str) -> PlanResult {
        let mut plan = default_plan("vendor audits");
        plan.summary = summary.to_string();
        plan.plan = vec!["a".into(), "b".into(), "c".into()];
        plan
    }

    async fn build_for(storage: &Arc<dyn BlueprintStorage>, plan: &PlanResult) -> String {
        storage
            .create_build(NewBuild {
                problem: "vendor audits".into(),
                summary: plan.summary.clone(),
                domain: plan.domain.clone(),
                plan: plan.plan.clone(),
                ..NewBuild::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn successful_run_completes_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn BlueprintStorage> = Arc::new(InMemoryStorage::new());
        let orchestrator =
            Orchestrator::new(storage.clone(), Arc::new(TemplateFilesVerifier), dir.path());
        let plan = plan_abc("Vendor Audit & Review!");
        let build_id = build_for(&storage, &plan).await;

        let outcome = orchestrator.run(&build_id, "vendor audits", &plan).await.unwrap();
        assert!(outcome.manifest_path.is_file());
        assert!(outcome.workspace.ends_with("vendor-audit-review"));
        assert!(outcome.workspace.join(README_FILE).is_file());
        assert!(outcome.workspace.join(APP_SPEC_FILE).is_file());

        let run = storage.get_run(&outcome.run_id).await.unwrap();
        assert_eq!(run.status, RunStatus::Ready);
        let names: Vec<&str> = run.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(run.steps.iter().all(|s| s.status == StepStatus::Completed));

        let artifacts = storage.list_artifacts(&outcome.run_id).await.unwrap();
        assert_eq!(artifacts[0].kind, ArtifactKind::Manifest);
        assert!(artifacts.iter().any(|a| a.kind == ArtifactKind::Generated));
        assert!(artifacts.iter().any(|a| a.kind == ArtifactKind::App));
        assert!(artifacts.iter().all(|a| Path::new(&a.path).is_absolute()));
    }

    #[tokio::test]
    async fn verification_failure_fails_run_and_steps() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn BlueprintStorage> = Arc::new(InMemoryStorage::new());
        let orchestrator = Orchestrator::new(storage.clone(), Arc::new(Rejecting), dir.path());
        let plan = plan_abc("Vendor Audit");
        let build_id = build_for(&storage, &plan).await;

        let err = orchestrator.run(&build_id, "vendor audits", &plan).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Verify(_)));
        assert!(err.to_string().contains("type errors"));

        let runs = storage.list_runs(&build_id).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Failed);
        assert_eq!(runs[0].steps.len(), 3);
        assert!(runs[0].steps.iter().all(|s| s.status == StepStatus::Failed));
        assert!(runs[0]
            .steps
            .iter()
            .all(|s| s.detail.as_deref() == Some(err.to_string().as_str())));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn generators_run_on_the_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let spec = default_plan("vendor audits").spec;
        let (scaffold, app) = write_generated(dir.path().to_path_buf(), spec).await.unwrap();
        assert_eq!(scaffold.len(), 5);
        assert!(!app.is_empty());
        assert!(scaffold.iter().chain(&app).all(|p| p.is_file()));
    }

    #[tokio::test]
    async fn generator_failure_surfaces_as_codegen_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "not a directory").unwrap();
        let spec = default_plan("vendor audits").spec;

        let err = write_generated(blocker, spec).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Codegen(_)));
    }

    #[tokio::test]
    async fn empty_summary_uses_build_id_folder() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn BlueprintStorage> = Arc::new(InMemoryStorage::new());
        let orchestrator =
            Orchestrator::new(storage.clone(), Arc::new(TemplateFilesVerifier), dir.path());
        let plan = plan_abc("!!!");
        let build_id = build_for(&storage, &plan).await;

        let outcome = orchestrator.run(&build_id, "vendor audits", &plan).await.unwrap();
        assert!(outcome.workspace.ends_with(&build_id));
    }

    #[tokio::test]
    async fn unknown_build_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn BlueprintStorage> = Arc::new(InMemoryStorage::new());
        let orchestrator = Orchestrator::new(storage, Arc::new(TemplateFilesVerifier), dir.path());
        let err = orchestrator
            .run("nope", "x", &plan_abc("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Storage(_)));
    }

    #[tokio::test]
    async fn submit_without_model_uses_default_plan() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn BlueprintStorage> = Arc::new(InMemoryStorage::new());
        let orchestrator =
            Orchestrator::new(storage.clone(), Arc::new(TemplateFilesVerifier), dir.path());
        let outcome = orchestrator.submit(None, "plan field trips").await.unwrap();

        let build = storage.get_build(&outcome.build_id).await.unwrap();
        assert_eq!(build.summary, "Plan Field Trips");
        let run = storage.get_run(&outcome.run_id).await.unwrap();
        assert_eq!(run.steps.len(), build.plan.len());
    }

    #[tokio::test]
    async fn missing_paths_are_all_reported_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present");
        std::fs::write(&present, "").unwrap();
        let paths = vec![
            dir.path().join("gone-1"),
            present,
            dir.path().join("gone-2"),
        ];
        let missing = missing_artifacts(paths).await.unwrap();
        assert_eq!(
            missing,
            vec![dir.path().join("gone-1"), dir.path().join("gone-2")]
        );
    }

    #[test]
    fn folder_falls_back_to_build_id() {
        assert_eq!(workspace_folder("b-1", "Vendor Audit & Review!"), "vendor-audit-review");
        assert_eq!(workspace_folder("b-1", ""), "b-1");
    }
}
