//! Shared fixtures for the HTTP-level tests.
//!
//! The palette service is started on `127.0.0.1:0` with both upstreams
//! pointed at `wiremock` servers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use webmuse::adapters::ReqwestHttpClient;
use webmuse::config::ServiceConfig;
use webmuse::palette::PaletteOrchestrator;
use webmuse::server::{start_server_on, AppState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATION_PATH: &str = "/generate";
pub const EXTENSION_PATH: &str = "/api/";

/// A running palette service plus its two upstream doubles.
pub struct TestService {
    pub addr: SocketAddr,
    pub generation: MockServer,
    pub extension: MockServer,
    handle: JoinHandle<()>,
}

impl TestService {
    pub async fn start() -> Self {
        Self::start_with_timeout(Duration::from_secs(2)).await
    }

    /// Start with `timeout` as the bound on every outbound call.
    pub async fn start_with_timeout(timeout: Duration) -> Self {
        let generation = MockServer::start().await;
        let extension = MockServer::start().await;

        let config = ServiceConfig::default()
            .with_generation_url(format!("{}{}", generation.uri(), GENERATION_PATH))
            .with_extension_url(format!("{}{}", extension.uri(), EXTENSION_PATH))
            .with_request_timeout(timeout);

        let http = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout).unwrap());
        let state = AppState::new(PaletteOrchestrator::from_config(http, &config));
        let (handle, addr) = start_server_on("127.0.0.1:0".parse().unwrap(), state)
            .await
            .unwrap();

        Self {
            addr,
            generation,
            extension,
            handle,
        }
    }

    pub fn url(&self, route: &str) -> String {
        format!("http://{}{}", self.addr, route)
    }

    /// Generation double answering `{"response": text}`.
    pub async fn mock_generation(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path(GENERATION_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": text })),
            )
            .mount(&self.generation)
            .await;
    }

    pub async fn mock_extension(&self, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(EXTENSION_PATH))
            .respond_with(template)
            .mount(&self.extension)
            .await;
    }

    pub async fn extension_calls(&self) -> usize {
        self.extension
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }

    pub async fn generation_calls(&self) -> usize {
        self.generation
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
