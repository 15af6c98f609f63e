//! Request handlers for the palette service.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use super::response::{GeneratePaletteRequest, PaletteBody};
use super::AppState;
use crate::error::PaletteError;

/// `POST /api/generate-palette`
///
/// A body that is not JSON, or lacks a string `prompt`, is treated the same
/// as a missing prompt.
pub(super) async fn generate_palette(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePaletteRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("palette_request", request_id = %request_id);

    async move {
        let prompt = match payload {
            Ok(Json(body)) => body.prompt.unwrap_or_default(),
            Err(rejection) => {
                tracing::warn!("Rejected palette request body: {}", rejection.body_text());
                return PaletteError::MissingPrompt.into_response();
            }
        };

        match state.orchestrator.generate_palette(&prompt).await {
            Ok(outcome) => Json(PaletteBody {
                palette: outcome.palette,
            })
            .into_response(),
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}

/// `GET /health`
pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
