use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::record::{
    ArtifactKind, ArtifactRecord, BuildRecord, NewBuild, RunRecord, RunStatus, StepStatus,
};
use crate::state::StoreState;
use crate::traits::BlueprintStorage;

/// Storage persisted as one pretty-printed JSON document.
///
/// The whole record set is loaded on [`open`](Self::open) and rewritten after
/// every mutation (write to a sibling temp file, then rename), so separate
/// CLI invocations share history. A mutation whose write fails leaves both
/// the file and the in-memory state unchanged.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl JsonFileStorage {
    /// Open `path`, starting empty if the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => StoreState::default(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| StorageError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy of the state, persist it, then publish it.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        persist(&self.path, &next).await?;
        *guard = next;
        Ok(out)
    }
}

async fn persist(path: &Path, state: &StoreState) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let mut body =
        serde_json::to_string_pretty(state).map_err(|e| StorageError::Backend(e.to_string()))?;
    body.push('\n');

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, body).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)
}

#[async_trait]
impl BlueprintStorage for JsonFileStorage {
    async fn create_build(&self, build: NewBuild) -> Result<BuildRecord, StorageError> {
        self.mutate(|s| Ok(s.create_build(build))).await
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
        self.mutate(|s| s.create_run(build_id, status, step_names))
            .await
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
        self.mutate(|s| s.set_run_status(run_id, status, step_status, detail))
            .await
    }

    async fn append_artifact(
        &self,
        run_id: &str,
        kind: ArtifactKind,
        path: &str,
    ) -> Result<ArtifactRecord, StorageError> {
        self.mutate(|s| s.append_artifact(run_id, kind, path)).await
    }

    async fn list_artifacts(&self, run_id: &str) -> Result<Vec<ArtifactRecord>, StorageError> {
        self.state.read().await.list_artifacts(run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_build() -> NewBuild {
        NewBuild {
            problem: "track vendor audits".into(),
            summary: "Vendor Audit".into(),
            domain: "procurement".into(),
            plan: vec!["scaffold".into(), "verify".into()],
            ..NewBuild::default()
        }
    }

    #[tokio::test]
    async fn reopen_sees_previous_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/store.json");

        let first = JsonFileStorage::open(&path).await.unwrap();
        let build = first.create_build(new_build()).await.unwrap();
        let run = first
            .create_run(&build.id, RunStatus::Running, &build.plan)
            .await
            .unwrap();
        first
            .append_artifact(&run.id, ArtifactKind::Manifest, "/tmp/manifest.json")
            .await
            .unwrap();
        first
            .set_run_status(&run.id, RunStatus::Ready, StepStatus::Completed, None)
            .await
            .unwrap();
        let settled_build = first.get_build(&build.id).await.unwrap();
        drop(first);

        let second = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(second.get_build(&build.id).await.unwrap(), settled_build);
        let reloaded = second.get_run(&run.id).await.unwrap();
        assert_eq!(reloaded.status, RunStatus::Ready);
        assert!(reloaded
            .steps
            .iter()
            .all(|s| s.status == StepStatus::Completed));
        assert_eq!(second.list_artifacts(&run.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStorage::open(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
        assert!(err.to_string().contains("store.json"));
    }

    #[tokio::test]
    async fn failed_mutation_does_not_touch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let storage = JsonFileStorage::open(&path).await.unwrap();
        let err = storage
            .create_run("missing", RunStatus::Running, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::BuildNotFound { .. }));
        assert!(!path.exists());
    }
}
