//! The record set shared by the in-memory and file backends.
//!
//! All mutation logic lives here as plain synchronous methods; backends only
//! add locking (and, for the file backend, persistence).

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::record::{
    new_id, now_rfc3339, ArtifactKind, ArtifactRecord, BuildRecord, NewBuild, RunRecord,
    RunStatus, StepStatus,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    #[serde(default)]
    pub builds: Vec<BuildRecord>,
    #[serde(default)]
    pub runs: Vec<RunRecord>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord>,
}

fn build_not_found(build_id: &str) -> StorageError {
    StorageError::BuildNotFound {
        build_id: build_id.to_string(),
    }
}

fn run_not_found(run_id: &str) -> StorageError {
    StorageError::RunNotFound {
        run_id: run_id.to_string(),
    }
}

impl StoreState {
    pub fn create_build(&mut self, build: NewBuild) -> BuildRecord {
        let record = BuildRecord::new(build);
        self.builds.push(record.clone());
        record
    }

    pub fn get_build(&self, build_id: &str) -> Result<BuildRecord, StorageError> {
        self.builds
            .iter()
            .find(|b| b.id == build_id)
            .cloned()
            .ok_or_else(|| build_not_found(build_id))
    }

    fn ensure_build(&self, build_id: &str) -> Result<(), StorageError> {
        if self.builds.iter().any(|b| b.id == build_id) {
            Ok(())
        } else {
            Err(build_not_found(build_id))
        }
    }

    fn touch_build(&mut self, build_id: &str, now: &str) {
        if let Some(build) = self.builds.iter_mut().find(|b| b.id == build_id) {
            build.updated_at = now.to_string();
        }
    }

    pub fn create_run(
        &mut self,
        build_id: &str,
        status: RunStatus,
        step_names: &[String],
    ) -> Result<RunRecord, StorageError> {
        self.ensure_build(build_id)?;
        let run = RunRecord::new(build_id, status, step_names);
        self.touch_build(build_id, &run.created_at);
        self.runs.push(run.clone());
        Ok(run)
    }

    pub fn get_run(&self, run_id: &str) -> Result<RunRecord, StorageError> {
        self.runs
            .iter()
            .find(|r| r.id == run_id)
            .cloned()
            .ok_or_else(|| run_not_found(run_id))
    }

    pub fn list_runs(&self, build_id: &str) -> Result<Vec<RunRecord>, StorageError> {
        self.ensure_build(build_id)?;
        Ok(self
            .runs
            .iter()
            .filter(|r| r.build_id == build_id)
            .cloned()
            .collect())
    }

    pub fn set_run_status(
        &mut self,
        run_id: &str,
        status: RunStatus,
        step_status: StepStatus,
        detail: Option<&str>,
    ) -> Result<RunRecord, StorageError> {
        let now = now_rfc3339();
        let run = self
            .runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or_else(|| run_not_found(run_id))?;
        run.status = status;
        for step in &mut run.steps {
            step.status = step_status;
            step.detail = detail.map(str::to_string);
            step.updated_at = now.clone();
        }
        run.updated_at = now.clone();
        let run = run.clone();
        self.touch_build(&run.build_id, &now);
        Ok(run)
    }

    pub fn append_artifact(
        &mut self,
        run_id: &str,
        kind: ArtifactKind,
        path: &str,
    ) -> Result<ArtifactRecord, StorageError> {
        if !self.runs.iter().any(|r| r.id == run_id) {
            return Err(run_not_found(run_id));
        }
        let record = ArtifactRecord {
            id: new_id(),
            run_id: run_id.to_string(),
            kind,
            path: path.to_string(),
            created_at: now_rfc3339(),
        };
        self.artifacts.push(record.clone());
        Ok(record)
    }

    pub fn list_artifacts(&self, run_id: &str) -> Result<Vec<ArtifactRecord>, StorageError> {
        if !self.runs.iter().any(|r| r.id == run_id) {
            return Err(run_not_found(run_id));
        }
        Ok(self
            .artifacts
            .iter()
            .filter(|a| a.run_id == run_id)
            .cloned()
            .collect())
    }
}
