//! HTTP surface of the palette service.
//!
//! Routes:
//! - `POST /api/generate-palette` - run the pipeline for `{"prompt"}`
//! - `GET /health` - liveness probe
//!
//! Each request runs on its own task and shares only the immutable
//! [`PaletteOrchestrator`].

mod handlers;
pub mod response;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::PaletteError;
use crate::palette::PaletteOrchestrator;

pub(crate) use handlers::health;
pub use response::{error_response, ErrorBody, GeneratePaletteRequest, PaletteBody};

pub const PALETTE_ROUTE: &str = "/api/generate-palette";
pub const HEALTH_ROUTE: &str = "/health";

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PaletteOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: PaletteOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// The palette service router with all middleware applied.
pub fn router(state: AppState) -> Router {
    with_middleware(
        Router::new()
            .route(PALETTE_ROUTE, post(handlers::generate_palette))
            .route(HEALTH_ROUTE, get(handlers::health))
            .with_state(state),
    )
}

/// CORS for the browser client, request tracing, and panic containment.
pub fn with_middleware(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Turn a handler panic into [`PaletteError::Internal`]; only its bounded
/// message reaches the caller.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    let err = PaletteError::Internal(format!("handler panicked: {}", detail));
    tracing::error!(
        category = %err.category(),
        code = err.error_code(),
        "Request failed: {}",
        err
    );
    err.into_response()
}

/// Start the palette service on `addr`.
///
/// Binding to port 0 picks a free port; the bound address is returned
/// alongside the server task handle.
pub async fn start_server_on(
    addr: SocketAddr,
    state: AppState,
) -> color_eyre::Result<(JoinHandle<()>, SocketAddr)> {
    serve_router(addr, router(state), "Palette service").await
}

/// Bind `addr` and serve `app` on a background task.
pub async fn serve_router(
    addr: SocketAddr,
    app: Router,
    name: &'static str,
) -> color_eyre::Result<(JoinHandle<()>, SocketAddr)> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("{} listening on http://{}", name, actual_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("{} error: {}", name, e);
        }
    });

    Ok((handle, actual_addr))
}
