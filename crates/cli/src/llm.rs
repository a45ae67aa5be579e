//! Anthropic Messages API client with retry and rate-limit handling.
//!
//! Implements [`ModelClient`] over the blocking `ureq` agent, run on the
//! blocking thread pool.

use async_trait::async_trait;
use blueprint_codegen::{CompletionRequest, ModelClient, ModelError};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Anthropic Messages API endpoint.
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Required API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_TOKENS: u32 = 8192;

/// Default maximum retries for transient errors.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds (doubles each retry).
const INITIAL_BACKOFF_MS: u64 = 1000;

// ── Request / Response types ─────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Model client backed by the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// A client for the configured key and model, or `None` without a key.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .api_key
            .as_ref()
            .map(|key| Self::new(key.clone(), config.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        if self.api_key.is_empty() {
            return Err(ModelError::MissingApiKey);
        }
        let system = system_with_schema(&request.system, &request.schema);
        let user = request.user.clone();
        let api_key = self.api_key.clone();
        let model = self.model.clone();

        // ureq is synchronous, so wrap in spawn_blocking
        tokio::task::spawn_blocking(move || {
            with_retry(
                || call_anthropic_once(&api_key, &model, &system, &user),
                DEFAULT_MAX_RETRIES,
            )
        })
        .await
        .map_err(|e| ModelError::Internal(format!("task join error: {}", e)))?
    }
}

/// Append the response schema to the system instruction.
fn system_with_schema(system: &str, schema: &serde_json::Value) -> String {
    format!(
        "{}\n\nThe response must be a single JSON value matching this JSON Schema:\n{}",
        system, schema
    )
}

/// Make a single API call (no retry).
fn call_anthropic_once(
    api_key: &str,
    model: &str,
    system: &str,
    user_prompt: &str,
) -> Result<String, ModelError> {
    let request_body = MessagesRequest {
        model: model.to_string(),
        max_tokens: MAX_TOKENS,
        system: system.to_string(),
        messages: vec![Message {
            role: "user".to_string(),
            content: user_prompt.to_string(),
        }],
    };

    let agent = ureq::Agent::new_with_defaults();
    let response = agent
        .post(ANTHROPIC_API_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("content-type", "application/json")
        .send_json(&request_body)
        .map_err(|e| ModelError::Api(format!("API request failed: {}", e)))?;

    let resp: MessagesResponse = response
        .into_body()
        .read_json()
        .map_err(|e| ModelError::Api(format!("failed to parse API response: {}", e)))?;

    resp.content
        .into_iter()
        .find_map(|block| block.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ModelError::EmptyResponse)
}

/// Retry a fallible operation with exponential backoff.
///
/// Retries only on errors deemed retryable (429, 5xx gateway errors,
/// connection failures). Backoff starts at `INITIAL_BACKOFF_MS` and doubles
/// each retry.
fn with_retry<T, F: Fn() -> Result<T, ModelError>>(
    f: F,
    max_retries: u32,
) -> Result<T, ModelError> {
    let mut backoff_ms = INITIAL_BACKOFF_MS;

    for attempt in 0..max_retries {
        match f() {
            Ok(val) => return Ok(val),
            Err(e) if is_retryable(&e.to_string()) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = max_retries + 1,
                    backoff_ms,
                    error = %e,
                    "retryable model error"
                );
                std::thread::sleep(std::time::Duration::from_millis(backoff_ms));
                backoff_ms *= 2;
            }
            Err(e) => return Err(e),
        }
    }
    f()
}

/// Extract an HTTP status code from an error string.
///
/// ureq v3 formats errors as "http status: NNN ..." which this captures.
fn extract_http_status(error: &str) -> Option<u16> {
    for word in error.split_whitespace() {
        let clean = word.trim_matches(|c: char| !c.is_ascii_digit());
        if clean.len() == 3 {
            if let Ok(code) = clean.parse::<u16>() {
                if (400..=599).contains(&code) {
                    return Some(code);
                }
            }
        }
    }
    None
}

/// Retryable: 429, 500, 502, 503, 529 and network-level failures.
fn is_retryable(error: &str) -> bool {
    if let Some(status) = extract_http_status(error) {
        return matches!(status, 429 | 500 | 502 | 503 | 529);
    }
    let lower = error.to_lowercase();
    lower.contains("connection") || lower.contains("timeout") || lower.contains("timed out")
}
