//! Request and response bodies for the palette endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::error::PaletteError;
use crate::palette::Palette;

/// `POST /api/generate-palette` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePaletteRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Success body: `{"palette": [[r, g, b], ...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaletteBody {
    pub palette: Palette,
}

/// Failure body: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Build an `{"error": ...}` response with `status`.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

/// Only the bounded [`PaletteError::user_message`] reaches the caller.
impl IntoResponse for PaletteError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        error_response(status, self.user_message())
    }
}
