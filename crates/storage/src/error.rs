use std::path::PathBuf;

/// All errors that can be returned by a BlueprintStorage implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No build with the given id.
    #[error("build not found: {build_id}")]
    BuildNotFound { build_id: String },

    /// No run with the given id.
    #[error("run not found: {run_id}")]
    RunNotFound { run_id: String },

    /// The backing file could not be read or written.
    #[error("storage file '{path}': {source}", path = .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file exists but does not hold a valid store.
    #[error("corrupt storage file '{path}': {message}", path = .path.display())]
    Corrupt { path: PathBuf, message: String },

    /// A backend-specific storage error (serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
