//! Generation bridge: the `{prompt} -> {response}` contract in front of Ollama.
//!
//! Routes:
//! - `POST /generate` - forward the prompt to Ollama's chat API
//! - `GET /health` - liveness probe

pub mod ollama;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::server::{error_response, health, with_middleware, HEALTH_ROUTE};

pub use ollama::{BridgeError, ChatRequest, OllamaClient};

pub const GENERATE_ROUTE: &str = "/generate";

#[derive(Debug, Clone, Default, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Clone)]
pub struct BridgeState {
    pub ollama: Arc<OllamaClient>,
}

/// The bridge router with the same middleware as the palette service.
pub fn router(ollama: OllamaClient) -> Router {
    let state = BridgeState {
        ollama: Arc::new(ollama),
    };
    with_middleware(
        Router::new()
            .route(GENERATE_ROUTE, post(generate))
            .route(HEALTH_ROUTE, get(health))
            .with_state(state),
    )
}

async fn generate(
    State(state): State<BridgeState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let prompt = payload
        .ok()
        .and_then(|Json(body)| body.prompt)
        .filter(|p| !p.trim().is_empty());

    let Some(prompt) = prompt else {
        return error_response(StatusCode::BAD_REQUEST, "Prompt is required");
    };

    match state.ollama.chat(&prompt).await {
        Ok(response) => Json(GenerateResponse { response }).into_response(),
        Err(e) => {
            tracing::error!("Generation failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
