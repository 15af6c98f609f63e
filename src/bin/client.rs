//! `webmuse-client`: terminal swatch client.

use std::sync::Arc;

use color_eyre::Result;
use webmuse::adapters::ReqwestHttpClient;
use webmuse::client::{run, PaletteApiClient};
use webmuse::config::ClientConfig;
use webmuse::logging::init_stderr_logging;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // The TUI owns stdout
    if std::env::var_os("WEBMUSE_LOG").is_some() {
        init_stderr_logging("info");
    }

    let config = ClientConfig::from_env()?;
    let http = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)?);
    run(PaletteApiClient::new(http, &config)).await
}
