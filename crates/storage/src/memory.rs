use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::record::{
    ArtifactKind, ArtifactRecord, BuildRecord, NewBuild, RunRecord, RunStatus, StepStatus,
};
use crate::state::StoreState;
use crate::traits::BlueprintStorage;

/// Process-local storage. Used by tests and by `blueprint serve` when no
/// store file is given.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: RwLock<StoreState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlueprintStorage for InMemoryStorage {
    async fn create_build(&self, build: NewBuild) -> Result<BuildRecord, StorageError> {
        Ok(self.state.write().await.create_build(build))
    }

    async fn get_build(&self, build_id: &str) -> Result<BuildRecord, StorageError> {
        self.state.read().await.get_build(build_id)
    }

    async fn list_builds(&self) -> Result<Vec<BuildRecord>, StorageError> {
        Ok(self.state.read().await.builds.clone())
    }

    async fn create_run(
        &self,
        build_id: &str,
        status: RunStatus,
        step_names: &[String],
    ) -> Result<RunRecord, StorageError> {
        self.state
            .write()
            .await
            .create_run(build_id, status, step_names)
    }

    async fn get_run(&self, run_id: &str) -> Result<RunRecord, StorageError> {
        self.state.read().await.get_run(run_id)
    }

    async fn list_runs(&self, build_id: &str) -> Result<Vec<RunRecord>, StorageError> {
        self.state.read().await.list_runs(build_id)
    }

    async fn set_run_status(
        &self,
        run_id: &str,
        status: RunStatus,
        step_status: StepStatus,
        detail: Option<&str>,
    ) -> Result<RunRecord, StorageError> {
        self.state
            .write()
            .await
            .set_run_status(run_id, status, step_status, detail)
    }

    async fn append_artifact(
        &self,
        run_id: &str,
        kind: ArtifactKind,
        path: &str,
    ) -> Result<ArtifactRecord, StorageError> {
        self.state.write().await.append_artifact(run_id, kind, path)
    }

    async fn list_artifacts(&self, run_id: &str) -> Result<Vec<ArtifactRecord>, StorageError> {
        self.state.read().await.list_artifacts(run_id)
    }
}
