use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{
    ArtifactKind, ArtifactRecord, BuildRecord, NewBuild, RunRecord, RunStatus, StepStatus,
};

/// Persistence for builds, their runs and the artifacts each run records.
///
/// ## Ordering
///
/// `list_builds`, `list_runs` and `list_artifacts` return records in the
/// order they were created. Steps keep the order of the names passed to
/// `create_run`.
///
/// ## Referential checks
///
/// `create_run` and `list_runs` fail with `BuildNotFound` for an unknown
/// build; `set_run_status`, `append_artifact` and `list_artifacts` fail
/// with `RunNotFound` for an unknown run.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so they can be shared as
/// `Arc<dyn BlueprintStorage>` across the orchestrator and axum state.
#[async_trait]
pub trait BlueprintStorage: Send + Sync + 'static {
    // ── Builds ───────────────────────────────────────────────────────────────

    /// Store a new build and return it with its generated id.
    async fn create_build(&self, build: NewBuild) -> Result<BuildRecord, StorageError>;

    async fn get_build(&self, build_id: &str) -> Result<BuildRecord, StorageError>;

    async fn list_builds(&self) -> Result<Vec<BuildRecord>, StorageError>;

    // ── Runs ─────────────────────────────────────────────────────────────────

    /// Create a run for `build_id` with one `pending` step per name.
    async fn create_run(
        &self,
        build_id: &str,
        status: RunStatus,
        step_names: &[String],
    ) -> Result<RunRecord, StorageError>;

    async fn get_run(&self, run_id: &str) -> Result<RunRecord, StorageError>;

    async fn list_runs(&self, build_id: &str) -> Result<Vec<RunRecord>, StorageError>;

    /// Set the run status and bulk-set every step to `step_status`.
    ///
    /// `detail` replaces each step's free-text detail. Step and build
    /// `updated_at` are bumped. Returns the updated run.
    async fn set_run_status(
        &self,
        run_id: &str,
        status: RunStatus,
        step_status: StepStatus,
        detail: Option<&str>,
    ) -> Result<RunRecord, StorageError>;

    // ── Artifacts ────────────────────────────────────────────────────────────

    async fn append_artifact(
        &self,
        run_id: &str,
        kind: ArtifactKind,
        path: &str,
    ) -> Result<ArtifactRecord, StorageError>;

    async fn list_artifacts(&self, run_id: &str) -> Result<Vec<ArtifactRecord>, StorageError>;
}
