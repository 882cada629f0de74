//! Remote text-generation client.
//!
//! Single fixed HTTP POST endpoint, single attempt per call. Failure handling
//! is delegated entirely to the response resolver's fallback chain: this
//! client reports what went wrong and never retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::CompletionError;

/// Default request timeout for the remote endpoint.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A text-generation backend the resolver can fall back to.
///
/// Implementations are expected to make exactly one attempt per call.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Generate a continuation for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// One element of the endpoint's JSON-array response.
#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: Option<String>,
}

/// Extract the generated text from a response body.
///
/// The expected shape is a JSON array whose first element carries a non-empty
/// `generated_text` field; anything else is malformed.
fn extract_generated_text(body: &str) -> Result<String, CompletionError> {
    let generations: Vec<Generation> =
        serde_json::from_str(body).map_err(|_| CompletionError::Malformed)?;
    generations
        .into_iter()
        .next()
        .and_then(|g| g.generated_text)
        .filter(|text| !text.is_empty())
        .ok_or(CompletionError::Malformed)
}

/// HTTP client for the remote completion endpoint.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionClient {
    /// Create a client for the given endpoint with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client, using default");
                reqwest::Client::new()
            });
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": prompt }))
            .send()
            .await
            .map_err(|e| CompletionError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::BadResponse(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Unavailable(e.to_string()))?;

        let text = extract_generated_text(&body)?;
        tracing::debug!(prompt_len = prompt.len(), text_len = text.len(), "Remote completion succeeded");
        Ok(text)
    }
}

// =============================================================================
// Tests
// =============================================================================
