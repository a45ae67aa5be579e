//! The verification gate run over a finished workspace.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use blueprint_codegen::{TEMPLATE_FILES, TEMPLATE_ROOT};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("verification command is empty")]
    EmptyCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program}' exited with {}: {stderr}", exit_label(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("workspace is missing template files: {}", .files.join(", "))]
    MissingFiles { files: Vec<String> },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Pass/fail check over a generated workspace.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, workspace: &Path) -> Result<(), VerifyError>;
}

/// Runs an external program with the workspace as its last argument and
/// as its working directory.
#[derive(Debug, Clone)]
pub struct CommandVerifier {
    program: String,
    args: Vec<String>,
}

impl CommandVerifier {
    pub fn from_argv(argv: &[String]) -> Result<Self, VerifyError> {
        let (program, args) = argv.split_first().ok_or(VerifyError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Verifier for CommandVerifier {
    async fn verify(&self, workspace: &Path) -> Result<(), VerifyError> {
        tracing::info!(program = %self.program, workspace = %workspace.display(), "running verification command");
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(workspace)
            .current_dir(workspace)
            .output()
            .await
            .map_err(|source| VerifyError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(VerifyError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Checks the fixed template file contract without running anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateFilesVerifier;

impl TemplateFilesVerifier {
    pub fn expected_paths(workspace: &Path) -> Vec<PathBuf> {
        TEMPLATE_FILES
            .iter()
            .map(|rel| workspace.join(TEMPLATE_ROOT).join(rel))
            .collect()
    }
}

#[async_trait]
impl Verifier for TemplateFilesVerifier {
    async fn verify(&self, workspace: &Path) -> Result<(), VerifyError> {
        let mut missing = Vec::new();
        for (rel, path) in TEMPLATE_FILES.iter().zip(Self::expected_paths(workspace)) {
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                missing.push(format!("{}/{}", TEMPLATE_ROOT, rel));
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(VerifyError::MissingFiles { files: missing })
        }
    }
}

/// The configured command, or the template file check when none is set.
pub fn verifier_for(config: &Config) -> Result<Arc<dyn Verifier>, VerifyError> {
    match &config.verify_command {
        Some(argv) => Ok(Arc::new(CommandVerifier::from_argv(argv)?)),
        None => Ok(Arc::new(TemplateFilesVerifier)),
    }
}
