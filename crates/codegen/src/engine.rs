//! Model-backed codegen engine.
//!
//! For each [`CodegenTarget`] the engine prompts a [`ModelClient`] for a
//! `{path, content}` object, validates the content with the shallow syntax
//! gate and retries once with the validator's message when it fails. The
//! last content produced is always written, so every target path exists
//! after a pass. A content that is still invalid is reported in
//! [`TargetOutcome::validation_error`] and logged.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use blueprint_core::{parse_lenient, validate_content, Specification};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::catalog::{codegen_targets, CodegenTarget};
use crate::error::CodegenError;
use crate::write::{ensure_dirs, write_file};

/// Initial attempt plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// System instruction for every codegen request.
pub const SYSTEM_PROMPT: &str = "You are a senior full-stack engineer generating one file of a \
Next.js (App Router) + TypeScript application. Respond with a single JSON object with exactly \
two keys: \"path\" (the file path you were asked for) and \"content\" (the complete file \
contents as a string). Do not include explanations, Markdown or code fences.";

/// Failure of the model collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("model request failed: {0}")]
    Api(String),

    #[error("model response contained no text")]
    EmptyResponse,

    #[error("model task failed: {0}")]
    Internal(String),
}

/// One completion call: system instruction, user prompt and the JSON schema
/// the answer must follow.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub schema: Value,
}

/// The model seam. Implementations return the raw response text, which
/// callers parse defensively.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError>;
}

/// The object the model is asked to return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedFile {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub content: String,
}

/// Result of generating one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetOutcome {
    /// Absolute path the content was written to.
    pub path: PathBuf,
    pub attempts: u32,
    /// Validator message when the written content failed its last check.
    pub validation_error: Option<String>,
}

impl TargetOutcome {
    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }
}

/// JSON schema for [`GeneratedFile`].
pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "content": { "type": "string" }
        },
        "required": ["path", "content"],
        "additionalProperties": false
    })
}

/// Build the user prompt for `target`, optionally asking the model to fix
/// a validation error from the previous attempt.
pub fn build_prompt(
    spec: &Specification,
    target: &CodegenTarget,
    fix: Option<&str>,
) -> Result<String, CodegenError> {
    let spec_json = serde_json::to_string_pretty(spec)
        .map_err(|e| CodegenError::serialize("specification", e))?;

    let mut prompt = format!(
        "Project: {}\nDomain: {}\nEntities: {}\nWorkflows: {}\nIntegrations: {}\n\n\
         Target file: {}\nKind: {}\nDescription: {}\n\n\
         Full specification:\n{}\n",
        spec.name,
        spec.domain,
        spec.entity_names().join(", "),
        spec.workflow_names().join(", "),
        spec.integration_names().join(", "),
        target.path,
        target.kind,
        target.description,
        spec_json,
    );
    if let Some(message) = fix {
        prompt.push_str(&format!(
            "\nThe previous attempt was rejected. Fix this validation error: {}\n",
            message
        ));
    }
    Ok(prompt)
}

/// Parse a raw model response; anything unparsable yields empty content.
pub fn parse_generated(raw: &str) -> GeneratedFile {
    parse_lenient(raw).unwrap_or_default()
}

/// Drives the model over the target catalog and writes results under `root`.
pub struct CodegenEngine {
    client: Arc<dyn ModelClient>,
    root: PathBuf,
}

impl CodegenEngine {
    pub fn new(client: Arc<dyn ModelClient>, root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generate and write a single target.
    ///
    /// A model failure aborts with [`CodegenError::Model`]; a validation
    /// failure never does.
    pub async fn generate_target(
        &self,
        spec: &Specification,
        target: &CodegenTarget,
    ) -> Result<TargetOutcome, CodegenError> {
        let mut attempts = 0;
        let mut content = String::new();
        let mut validation_error: Option<String> = None;

        while attempts < MAX_ATTEMPTS {
            attempts += 1;
            let request = CompletionRequest {
                system: SYSTEM_PROMPT.to_string(),
                user: build_prompt(spec, target, validation_error.as_deref())?,
                schema: output_schema(),
            };
            let raw = self.client.complete(&request).await?;
            content = parse_generated(&raw).content;

            match validate_content(&content, target.extension()) {
                Ok(()) => {
                    validation_error = None;
                    break;
                }
                Err(e) => {
                    tracing::debug!(path = %target.path, attempt = attempts, error = %e, "generated content rejected");
                    validation_error = Some(e.to_string());
                }
            }
        }

        let path = self.root.join(&target.path);
        if let Some(parent) = path.parent() {
            ensure_dirs([parent])?;
        }
        write_file(&path, &content)?;

        if let Some(message) = &validation_error {
            tracing::warn!(
                path = %target.path,
                attempts,
                error = %message,
                "writing content that failed validation"
            );
        } else {
            tracing::info!(path = %target.path, attempts, "target generated");
        }

        Ok(TargetOutcome {
            path,
            attempts,
            validation_error,
        })
    }

    /// Generate every catalog target in order, one model call at a time.
    pub async fn generate_all(
        &self,
        spec: &Specification,
    ) -> Result<Vec<TargetOutcome>, CodegenError> {
        self.generate_targets(spec, &codegen_targets(spec)).await
    }

    /// Generate only the catalog targets whose path contains `filter`.
    pub async fn generate_matching(
        &self,
        spec: &Specification,
        filter: &str,
    ) -> Result<Vec<TargetOutcome>, CodegenError> {
        let targets: Vec<CodegenTarget> = codegen_targets(spec)
            .into_iter()
            .filter(|t| t.path.contains(filter))
            .collect();
        self.generate_targets(spec, &targets).await
    }

    async fn generate_targets(
        &self,
        spec: &Specification,
        targets: &[CodegenTarget],
    ) -> Result<Vec<TargetOutcome>, CodegenError> {
        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            outcomes.push(self.generate_target(spec, target).await?);
        }
        Ok(outcomes)
    }
}
