//! Ollama chat adapter and daemon management.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BridgeConfig;
use crate::error::excerpt;
use crate::traits::{json_headers, Headers, HttpClient, HttpError};

/// How long the liveness probe waits for `/api/tags`.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Errors talking to Ollama.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Ollama unreachable: {0}")]
    Transport(#[from] HttpError),

    #[error("Ollama returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected Ollama response: {0}")]
    InvalidBody(String),

    #[error("failed to start ollama: {0}")]
    Spawn(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

/// `POST /api/chat` body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

/// Client for a local Ollama daemon.
#[derive(Clone)]
pub struct OllamaClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaClient {
    pub fn new(http: Arc<dyn HttpClient>, config: &BridgeConfig) -> Self {
        Self {
            http,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        }
    }

    /// Send `prompt` as a single user message and return the reply text.
    pub async fn chat(&self, prompt: &str) -> Result<String, BridgeError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::to_string(&self.chat_request(prompt))
            .map_err(|e| BridgeError::InvalidBody(e.to_string()))?;

        tracing::info!(model = %self.model, "Querying Ollama");
        let response = self.http.post(&url, &body, &json_headers()).await?;

        if !response.is_success() {
            let message = response
                .json::<OllamaErrorBody>()
                .map(|b| b.error)
                .unwrap_or_else(|_| excerpt(&response.text_lossy(), 200));
            return Err(BridgeError::Status {
                status: response.status,
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| BridgeError::InvalidBody(e.to_string()))?;
        Ok(parsed.message.content)
    }

    /// True if the daemon answers `GET /api/tags` with 2xx within [`PROBE_TIMEOUT`].
    pub async fn is_running(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match tokio::time::timeout(PROBE_TIMEOUT, self.http.get(&url, &Headers::new())).await {
            Ok(Ok(response)) => response.is_success(),
            _ => false,
        }
    }

    /// Poll until the daemon is up or `timeout` elapses.
    pub async fn wait_until_running(&self, timeout: Duration) -> bool {
        let start = tokio::time::Instant::now();
        loop {
            if self.is_running().await {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Make sure a daemon is available, spawning `ollama serve` if allowed.
    ///
    /// A daemon that cannot be started or never comes up is logged, not
    /// fatal: the bridge keeps serving and individual requests fail until it does.
    pub async fn ensure_running(&self, autostart: bool, wait: Duration) {
        if self.is_running().await {
            tracing::info!(url = %self.base_url, "Ollama already running");
            return;
        }
        if !autostart {
            tracing::warn!(url = %self.base_url, "Ollama not running and autostart disabled");
            return;
        }

        match spawn_ollama_serve() {
            Ok(child) => tracing::info!("Starting Ollama server (pid: {:?})", child.id()),
            Err(e) => {
                tracing::warn!(
                    url = %self.base_url,
                    "{}; requests will fail until Ollama is reachable",
                    e
                );
                return;
            }
        }

        if self.wait_until_running(wait).await {
            tracing::info!(url = %self.base_url, "Ollama healthy");
        } else {
            tracing::warn!(
                "Ollama did not become healthy within {}s; requests will fail until it does",
                wait.as_secs()
            );
        }
    }
}

/// Start `ollama serve` as a detached background daemon.
///
/// The child is not killed when its handle drops; the daemon outlives the bridge.
fn spawn_ollama_serve() -> Result<tokio::process::Child, BridgeError> {
    tokio::process::Command::new("ollama")
        .arg("serve")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .kill_on_drop(false)
        .spawn()
        .map_err(|e| BridgeError::Spawn(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockHttpClient;

    const BASE: &str = "http://ollama.test";

    fn client(mock: &MockHttpClient) -> OllamaClient {
        let config = BridgeConfig::default().with_ollama_url(format!("{}/", BASE));
        OllamaClient::new(Arc::new(mock.clone()), &config)
    }

    #[tokio::test]
    async fn test_chat_request_shape_and_reply() {
        let mock = MockHttpClient::new();
        mock.set_json(
            "http://ollama.test/api/chat",
            200,
            serde_json::json!({
                "model": "deepseek-r1:7b",
                "message": {"role": "assistant", "content": "[1, 2, 3]"},
                "done": true
            }),
        );

        let reply = client(&mock).chat("colors please").await.unwrap();
        assert_eq!(reply, "[1, 2, 3]");

        let sent = mock.requests_to("http://ollama.test/api/chat")[0]
            .body_json()
            .unwrap();
        assert_eq!(sent["model"], "deepseek-r1:7b");
        assert_eq!(sent["stream"], false);
        assert_eq!(sent["messages"][0]["role"], "user");
        assert_eq!(sent["messages"][0]["content"], "colors please");
        assert_eq!(sent["options"]["num_predict"], 100);
        assert!((sent["options"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_chat_error_status_uses_ollama_message() {
        let mock = MockHttpClient::new();
        mock.set_json(
            "http://ollama.test/api/chat",
            404,
            serde_json::json!({"error": "model 'deepseek-r1:7b' not found"}),
        );

        let err = client(&mock).chat("x").await.unwrap_err();
        match err {
            BridgeError::Status { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("not found"));
            }
            other => panic!("Expected Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chat_invalid_body() {
        let mock = MockHttpClient::new();
        mock.set_json("http://ollama.test/api/chat", 200, serde_json::json!({"done": true}));
        assert!(matches!(
            client(&mock).chat("x").await,
            Err(BridgeError::InvalidBody(_))
        ));
    }

    #[tokio::test]
    async fn test_is_running() {
        let mock = MockHttpClient::new();
        assert!(!client(&mock).is_running().await);

        mock.set_json("http://ollama.test/api/tags", 200, serde_json::json!({"models": []}));
        assert!(client(&mock).is_running().await);
    }

    #[tokio::test]
    async fn test_ensure_running_without_autostart_does_not_spawn() {
        let mock = MockHttpClient::new();
        client(&mock)
            .ensure_running(false, Duration::from_millis(10))
            .await;
        assert_eq!(mock.requests_to("http://ollama.test/api/tags").len(), 1);
    }
}
