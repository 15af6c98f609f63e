//! Palette service calls made by the swatch client.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::palette::Palette;
use crate::traits::{json_headers, HttpClient, HttpError};

/// Shown when the request never produced a readable answer.
pub const TRANSPORT_ERROR_MESSAGE: &str = "An error occurred while generating the palette";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{}", TRANSPORT_ERROR_MESSAGE)]
    Transport(#[from] HttpError),

    /// The service answered with an `{"error": ...}` body.
    #[error("{0}")]
    Server(String),

    #[error("Unexpected response format")]
    UnexpectedFormat,
}

/// Either shape the palette endpoint answers with. Status codes are not
/// consulted; the body decides.
#[derive(Debug, Deserialize)]
struct PaletteReply {
    #[serde(default)]
    palette: Option<Palette>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct PaletteApiClient {
    http: Arc<dyn HttpClient>,
    endpoint: String,
}

impl PaletteApiClient {
    pub fn new(http: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            http,
            endpoint: config.palette_endpoint(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_palette(&self, prompt: &str) -> Result<Palette, ClientError> {
        let body = serde_json::json!({ "prompt": prompt }).to_string();
        let response = self.http.post(&self.endpoint, &body, &json_headers()).await?;

        let reply: PaletteReply = response.json().map_err(|e| {
            tracing::warn!(status = response.status, "Unreadable palette response: {}", e);
            ClientError::UnexpectedFormat
        })?;

        match reply {
            PaletteReply {
                palette: Some(palette),
                ..
            } if !palette.is_empty() => Ok(palette),
            PaletteReply {
                error: Some(message),
                ..
            } => Err(ClientError::Server(message)),
            _ => Err(ClientError::UnexpectedFormat),
        }
    }
}
