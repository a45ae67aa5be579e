//! Conformance test suite for `BlueprintStorage` implementations.
//!
//! A backend-agnostic suite that any `BlueprintStorage` implementation can
//! run to verify correctness. It covers:
//!
//! - **Builds**: creation, lookup, listing order, unknown ids
//! - **Runs**: step creation from plan names, listing per build, unknown builds
//! - **Status**: terminal transitions with bulk step updates
//! - **Artifacts**: append order, per-run isolation, unknown runs
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function that
//! creates a fresh, empty storage instance for each test:
//!
//! ```ignore
//! use blueprint_storage::conformance::run_conformance_suite;
//! use blueprint_storage::InMemoryStorage;
//!
//! #[tokio::test]
//! async fn memory_conformance() {
//!     let report = run_conformance_suite(|| async { InMemoryStorage::new() }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod artifact;
mod build;
mod run;
mod status;

use std::fmt;
use std::future::Future;

use crate::record::NewBuild;
use crate::BlueprintStorage;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "build", "run", "status").
    pub category: String,
    /// Test name (e.g. "create_run_has_pending_steps").
    pub name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a storage backend.
///
/// The `factory` function is called once per test to create a fresh, empty
/// storage instance, ensuring test isolation.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: BlueprintStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.extend(build::run_build_tests(&factory).await);
    results.extend(run::run_run_tests(&factory).await);
    results.extend(status::run_status_tests(&factory).await);
    results.extend(artifact::run_artifact_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_build(summary: &str, plan: &[&str]) -> NewBuild {
    NewBuild {
        problem: format!("Build a system for {}", summary.to_lowercase()),
        summary: summary.to_string(),
        domain: "operations".to_string(),
        stack: vec!["nextjs".to_string(), "postgres".to_string()],
        plan: plan.iter().map(|s| s.to_string()).collect(),
        deliverables: vec!["template app".to_string()],
    }
}

fn names(plan: &[&str]) -> Vec<String> {
    plan.iter().map(|s| s.to_string()).collect()
}
