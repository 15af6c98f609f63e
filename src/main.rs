//! `webmuse` palette service.

use std::sync::Arc;

use color_eyre::Result;
use webmuse::adapters::ReqwestHttpClient;
use webmuse::config::ServiceConfig;
use webmuse::logging::init_logging;
use webmuse::palette::PaletteOrchestrator;
use webmuse::server::{start_server_on, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging("info");

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        generation = %config.generation_url,
        extension = %config.extension_url,
        "Starting palette service"
    );

    let http = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)?);
    let orchestrator = PaletteOrchestrator::from_config(http, &config);
    let (handle, _addr) = start_server_on(config.bind, AppState::new(orchestrator)).await?;

    tokio::select! {
        _ = handle => tracing::error!("Server task exited"),
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }

    Ok(())
}
