//! Best-effort client for the palette-extension service (Colormind).
//!
//! Wire contract: `POST {"model": String, "input": [slot, ...]}` answered by
//! `{"result": [[r, g, b], ...]}`. Each input slot is either a seed color or
//! the placeholder `"N"` asking the service to infer that slot.
//!
//! Any failure collapses to `None`; the caller falls back to its seeds.

use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::color::ColorTriple;
use crate::error::excerpt;
use crate::traits::{json_headers, HttpClient, HttpError};

/// Wire marker for a slot the service should fill.
pub const INFER_MARKER: &str = "N";

/// Number of complementary slots requested after the seeds.
pub const INFERRED_SLOTS: usize = 2;

const BODY_EXCERPT_CHARS: usize = 200;

/// One entry of the extension request's `input` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSlot {
    Color(ColorTriple),
    Infer,
}

impl Serialize for SeedSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SeedSlot::Color(color) => color.serialize(serializer),
            SeedSlot::Infer => serializer.serialize_str(INFER_MARKER),
        }
    }
}

/// Request body for the extension service.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionRequest {
    pub model: String,
    pub input: Vec<SeedSlot>,
}

impl ExtensionRequest {
    /// Seeds followed by [`INFERRED_SLOTS`] placeholders.
    pub fn from_seeds(model: &str, seeds: &[ColorTriple]) -> Self {
        let input = seeds
            .iter()
            .copied()
            .map(SeedSlot::Color)
            .chain(std::iter::repeat(SeedSlot::Infer).take(INFERRED_SLOTS))
            .collect();
        Self {
            model: model.to_string(),
            input,
        }
    }
}

/// Response body from the extension service.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionResponse {
    #[serde(default)]
    pub result: Option<Vec<ColorTriple>>,
}

/// Why an extension call produced nothing. Logged, never surfaced.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("transport: {0}")]
    Transport(#[from] HttpError),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("markup instead of JSON: {0}")]
    Markup(String),

    #[error("malformed body: {0}")]
    Malformed(String),
}

/// Client for the extension service.
#[derive(Clone)]
pub struct ExtensionClient {
    http: Arc<dyn HttpClient>,
    url: String,
    model: String,
}

impl ExtensionClient {
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            model: model.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the service to extend `seeds`.
    ///
    /// Returns `None` on any failure and on an empty or missing result.
    pub async fn extend(&self, seeds: &[ColorTriple]) -> Option<Vec<ColorTriple>> {
        match self.try_extend(seeds).await {
            Ok(colors) if colors.is_empty() => {
                tracing::warn!(url = %self.url, "Extension service returned no colors");
                None
            }
            Ok(colors) => Some(colors),
            Err(e) => {
                tracing::warn!(url = %self.url, "Extension service unavailable: {}", e);
                None
            }
        }
    }

    async fn try_extend(&self, seeds: &[ColorTriple]) -> Result<Vec<ColorTriple>, ExtensionError> {
        let request = ExtensionRequest::from_seeds(&self.model, seeds);
        let body =
            serde_json::to_string(&request).map_err(|e| ExtensionError::Malformed(e.to_string()))?;

        tracing::info!(url = %self.url, body = %body, "Sending seeds to extension service");
        let response = self.http.post(&self.url, &body, &json_headers()).await?;
        let text = response.text_lossy();
        tracing::debug!(status = response.status, body = %excerpt(&text, BODY_EXCERPT_CHARS), "Extension service responded");

        if !response.is_success() {
            return Err(ExtensionError::Status {
                status: response.status,
                body: excerpt(&text, BODY_EXCERPT_CHARS),
            });
        }

        if looks_like_markup(&text) {
            return Err(ExtensionError::Markup(excerpt(&text, BODY_EXCERPT_CHARS)));
        }

        let parsed: ExtensionResponse =
            serde_json::from_str(&text).map_err(|e| ExtensionError::Malformed(e.to_string()))?;

        Ok(parsed.result.unwrap_or_default())
    }
}

/// Error pages served with a 2xx status.
fn looks_like_markup(body: &str) -> bool {
    body.contains("<html>") || body.contains("<body>")
}
