//! Caller-facing error type for the palette pipeline.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::services::GenerationError;

/// Everything that can stop a palette request.
///
/// `Display` carries the underlying cause and is meant for server-side logs.
/// Callers only ever see [`PaletteError::user_message`].
#[derive(Debug, Error)]
pub enum PaletteError {
    /// Prompt missing, empty or whitespace-only.
    #[error("prompt is missing or empty")]
    MissingPrompt,

    /// The generation call failed at the transport or HTTP level.
    #[error("generation service failed: {0}")]
    Generation(#[source] GenerationError),

    /// The generation call succeeded but carried no usable text.
    #[error("generation service returned no usable text: {0}")]
    EmptyResponse(String),

    /// Fewer than three RGB groups in the generated text.
    #[error("could not extract three RGB groups ({found} found) from: {excerpt}")]
    Extraction { found: usize, excerpt: String },

    /// Unexpected fault anywhere in the chain.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PaletteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PaletteError::MissingPrompt => ErrorCategory::Input,
            PaletteError::Generation(_) | PaletteError::EmptyResponse(_) => ErrorCategory::Upstream,
            PaletteError::Extraction { .. } => ErrorCategory::Extraction,
            PaletteError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status surfaced to the caller.
    pub fn status_code(&self) -> u16 {
        self.category().status_code()
    }

    /// Bounded message safe to return to the caller.
    pub fn user_message(&self) -> &'static str {
        match self {
            PaletteError::MissingPrompt => "Prompt is required",
            PaletteError::Generation(_) => "Failed to generate base colors",
            PaletteError::EmptyResponse(_) => "No valid response from the generation service",
            PaletteError::Extraction { .. } => "Could not extract three valid RGB colors",
            PaletteError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Short stable code for log correlation.
    pub fn error_code(&self) -> &'static str {
        match self {
            PaletteError::MissingPrompt => "PROMPT_MISSING",
            PaletteError::Generation(_) => "GENERATION_FAILED",
            PaletteError::EmptyResponse(_) => "GENERATION_EMPTY",
            PaletteError::Extraction { .. } => "EXTRACTION_FAILED",
            PaletteError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<GenerationError> for PaletteError {
    fn from(err: GenerationError) -> Self {
        if err.is_empty_response() {
            PaletteError::EmptyResponse(err.to_string())
        } else {
            PaletteError::Generation(err)
        }
    }
}

/// Message used for faults that are not otherwise classified, panics included.
pub const INTERNAL_ERROR_MESSAGE: &str = "Failed to generate color palette";

/// Limit `text` to `max` characters for inclusion in log messages.
pub fn excerpt(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
