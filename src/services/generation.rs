//! Client for the text-generation service.
//!
//! Wire contract: `POST {"prompt": String}` answered by `{"response": String}`.
//! The response text is free-form; structure is recovered later by
//! [`crate::extract`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::excerpt;
use crate::traits::{json_headers, HttpClient, HttpError};

/// Upstream bodies are truncated to this many characters in errors and logs.
const BODY_EXCERPT_CHARS: usize = 200;

/// Request body for the generation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
}

/// Response body from the generation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationResponse {
    #[serde(default)]
    pub response: Option<String>,
}

/// Failures of the generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Connection refused, DNS failure, timeout.
    #[error("{0}")]
    Transport(#[from] HttpError),

    /// Non-2xx status.
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx with a body that is not the expected JSON object.
    #[error("undecodable body: {0}")]
    InvalidBody(String),

    /// 2xx with a missing or blank `response` field.
    #[error("response field missing or blank")]
    Empty,
}

impl GenerationError {
    /// True when the service answered successfully but with nothing usable.
    pub fn is_empty_response(&self) -> bool {
        matches!(self, GenerationError::InvalidBody(_) | GenerationError::Empty)
    }
}

/// Strict client for the generation service: every failure is an error.
#[derive(Clone)]
pub struct GenerationClient {
    http: Arc<dyn HttpClient>,
    url: String,
}

impl GenerationClient {
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `instruction` and return the trimmed generated text.
    pub async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        let body = serde_json::to_string(&GenerationRequest {
            prompt: instruction.to_string(),
        })
        .map_err(|e| GenerationError::InvalidBody(e.to_string()))?;

        tracing::info!(url = %self.url, "Requesting base colors from generation service");
        let response = self.http.post(&self.url, &body, &json_headers()).await?;

        if !response.is_success() {
            let body = excerpt(&response.text_lossy(), BODY_EXCERPT_CHARS);
            tracing::error!(status = response.status, body = %body, "Generation service returned an error");
            return Err(GenerationError::Status {
                status: response.status,
                body,
            });
        }

        let parsed: GenerationResponse = response
            .json()
            .map_err(|e| GenerationError::InvalidBody(e.to_string()))?;

        let text = parsed
            .response
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(GenerationError::Empty)?;

        tracing::debug!(text = %excerpt(&text, BODY_EXCERPT_CHARS), "Generation service responded");
        Ok(text)
    }
}
