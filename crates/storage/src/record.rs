use std::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Generate a fresh record identifier (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Lifecycle of a run: `running` until it settles as `ready` or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Ready,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Ready => "ready",
            RunStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display status of a plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a recorded file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// `manifest.json`
    Manifest,
    /// `app-spec.json`, the expanded specification
    Spec,
    Readme,
    /// Static scaffold output
    Generated,
    /// Template app output
    App,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Manifest => "manifest",
            ArtifactKind::Spec => "spec",
            ArtifactKind::Readme => "readme",
            ArtifactKind::Generated => "generated",
            ArtifactKind::App => "app",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for [`crate::BlueprintStorage::create_build`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBuild {
    pub problem: String,
    pub summary: String,
    pub domain: String,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub plan: Vec<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

/// A stored build: one problem statement and the plan derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: String,
    pub problem: String,
    pub summary: String,
    pub domain: String,
    pub stack: Vec<String>,
    pub plan: Vec<String>,
    pub deliverables: Vec<String>,
    /// RFC 3339 timestamp string.
    pub created_at: String,
    /// Bumped whenever one of the build's runs is created or settles.
    pub updated_at: String,
}

impl BuildRecord {
    pub fn new(build: NewBuild) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            problem: build.problem,
            summary: build.summary,
            domain: build.domain,
            stack: build.stack,
            plan: build.plan,
            deliverables: build.deliverables,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// One named plan step of a run. Tracked for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub id: String,
    pub run_id: String,
    pub name: String,
    pub position: usize,
    pub status: StepStatus,
    /// Free-text note, e.g. why the step failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One execution attempt of the generation pipeline for a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub build_id: String,
    pub status: RunStatus,
    pub steps: Vec<StepRecord>,
    /// RFC 3339 timestamp string.
    pub created_at: String,
    /// RFC 3339 timestamp string.
    pub updated_at: String,
}

impl RunRecord {
    /// A run with one `pending` step per name, in order.
    pub fn new(build_id: &str, status: RunStatus, step_names: &[String]) -> Self {
        let now = now_rfc3339();
        let id = new_id();
        Self {
            steps: step_names
                .iter()
                .enumerate()
                .map(|(position, name)| StepRecord {
                    id: new_id(),
                    run_id: id.clone(),
                    name: name.clone(),
                    position,
                    status: StepStatus::Pending,
                    detail: None,
                    created_at: now.clone(),
                    updated_at: now.clone(),
                })
                .collect(),
            id,
            build_id: build_id.to_string(),
            status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A file produced during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub id: String,
    pub run_id: String,
    pub kind: ArtifactKind,
    pub path: String,
    /// RFC 3339 timestamp string.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&RunStatus::Ready).unwrap(), "\"ready\"");
        assert_eq!(serde_json::to_string(&StepStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&ArtifactKind::App).unwrap(), "\"app\"");
        assert_eq!(RunStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn new_run_has_pending_steps_in_order() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let run = RunRecord::new("build-1", RunStatus::Running, &names);
        assert_eq!(run.steps.len(), 3);
        assert!(run.steps.iter().all(|s| s.status == StepStatus::Pending));
        let order: Vec<(usize, &str)> = run
            .steps
            .iter()
            .map(|s| (s.position, s.name.as_str()))
            .collect();
        assert_eq!(order, vec![(0, "a"), (1, "b"), (2, "c")]);
        assert_ne!(run.steps[0].id, run.steps[1].id);
        assert!(run.steps.iter().all(|s| s.run_id == run.id));
        assert!(run.steps.iter().all(|s| s.detail.is_none()));
        assert_eq!(run.steps[0].created_at, run.created_at);
    }

    #[test]
    fn new_build_starts_with_equal_timestamps() {
        let build = BuildRecord::new(NewBuild {
            problem: "p".into(),
            ..NewBuild::default()
        });
        assert_eq!(build.created_at, build.updated_at);
    }

    #[test]
    fn timestamps_are_rfc3339() {
        let ts = now_rfc3339();
        assert!(OffsetDateTime::parse(&ts, &Rfc3339).is_ok(), "{ts}");
    }
}
