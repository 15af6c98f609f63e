//! `webmuse-bridge`: exposes a local Ollama model as the generation service.

use std::sync::Arc;

use color_eyre::Result;
use webmuse::adapters::ReqwestHttpClient;
use webmuse::bridge::{router, OllamaClient};
use webmuse::config::BridgeConfig;
use webmuse::logging::init_logging;
use webmuse::server::serve_router;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging("info");

    let config = BridgeConfig::from_env()?;
    let http = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)?);
    let ollama = OllamaClient::new(http, &config);

    ollama
        .ensure_running(config.autostart, config.startup_wait)
        .await;
    tracing::info!(model = %ollama.model(), "Generation bridge ready");

    let (handle, _addr) = serve_router(config.bind, router(ollama), "Generation bridge").await?;

    tokio::select! {
        _ = handle => tracing::error!("Server task exited"),
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }

    Ok(())
}
