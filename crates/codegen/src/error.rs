use std::path::PathBuf;

use crate::engine::ModelError;

/// Errors raised by the generators and the codegen engine.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// A directory in the output tree could not be created.
    #[error("failed to create directory '{path}': {source}", path = .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A generated file could not be written.
    #[error("failed to write '{path}': {source}", path = .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A JSON document could not be serialized.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: String,
        source: serde_json::Error,
    },

    /// The model collaborator failed; aborts the whole codegen stage.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CodegenError {
    pub(crate) fn serialize(what: &str, source: serde_json::Error) -> Self {
        CodegenError::Serialize {
            what: what.to_string(),
            source,
        }
    }
}
