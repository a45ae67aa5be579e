//! Application state.

use std::sync::Arc;

use blueprint_codegen::ModelClient;

use crate::orchestrator::Orchestrator;

/// Application state shared across request handlers.
pub(crate) struct AppState {
    /// Runs builds; also owns the storage handlers read from.
    pub(crate) orchestrator: Orchestrator,
    /// Planner model. None = every build uses the default plan.
    pub(crate) client: Option<Arc<dyn ModelClient>>,
    /// Optional API key for authentication. None = no auth required.
    pub(crate) api_key: Option<String>,
}
