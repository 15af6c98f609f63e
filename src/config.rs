//! Configuration for the service, the generation bridge and the client.
//!
//! Each binary has one config struct with defaults, `with_*` builders and
//! `from_env()`. Service locations are fixed for the lifetime of the process
//! and passed explicitly to whatever needs them.
//!
//! # Example
//!
//! ```ignore
//! use webmuse::config::ServiceConfig;
//!
//! let config = ServiceConfig::from_env()?
//!     .with_extension_model("ui");
//! ```

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_SERVICE_PORT: u16 = 8000;
pub const DEFAULT_GENERATION_URL: &str = "http://127.0.0.1:4000/generate";
pub const DEFAULT_EXTENSION_URL: &str = "http://colormind.io/api/";
pub const DEFAULT_EXTENSION_MODEL: &str = "default";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_BRIDGE_PORT: u16 = 4000;
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "deepseek-r1:7b";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 100;
pub const DEFAULT_OLLAMA_STARTUP_SECS: u64 = 5;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// A configuration value could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {var}: {value:?} ({reason})")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Read `var` through `lookup` and parse it, or fall back to `default`.
fn parse_var<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|e: T::Err| ConfigError {
                var,
                value: value.clone(),
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}

fn string_var<F>(lookup: &F, var: &'static str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn all_interfaces(port: u16) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], port))
}

fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Palette service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Listen address (`WEBMUSE_BIND`)
    pub bind: SocketAddr,
    /// Generation service endpoint (`WEBMUSE_GENERATION_URL`)
    pub generation_url: String,
    /// Extension service endpoint (`WEBMUSE_EXTENSION_URL`)
    pub extension_url: String,
    /// Model selector sent to the extension service (`WEBMUSE_EXTENSION_MODEL`)
    pub extension_model: String,
    /// Bound on each outbound call (`WEBMUSE_TIMEOUT_SECS`)
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: all_interfaces(DEFAULT_SERVICE_PORT),
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            extension_url: DEFAULT_EXTENSION_URL.to_string(),
            extension_model: DEFAULT_EXTENSION_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_generation_url(mut self, url: impl Into<String>) -> Self {
        self.generation_url = url.into();
        self
    }

    pub fn with_extension_url(mut self, url: impl Into<String>) -> Self {
        self.extension_url = url.into();
        self
    }

    pub fn with_extension_model(mut self, model: impl Into<String>) -> Self {
        self.extension_model = model.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build from an arbitrary variable source; unset or blank means default.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            bind: parse_var(&lookup, "WEBMUSE_BIND", defaults.bind)?,
            generation_url: string_var(&lookup, "WEBMUSE_GENERATION_URL", DEFAULT_GENERATION_URL),
            extension_url: string_var(&lookup, "WEBMUSE_EXTENSION_URL", DEFAULT_EXTENSION_URL),
            extension_model: string_var(
                &lookup,
                "WEBMUSE_EXTENSION_MODEL",
                DEFAULT_EXTENSION_MODEL,
            ),
            request_timeout: Duration::from_secs(parse_var(
                &lookup,
                "WEBMUSE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }
}

/// Generation bridge configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Listen address (`WEBMUSE_BRIDGE_BIND`)
    pub bind: SocketAddr,
    /// Ollama daemon base URL (`OLLAMA_URL`)
    pub ollama_url: String,
    /// Chat model (`WEBMUSE_MODEL`)
    pub model: String,
    /// Sampling temperature (`WEBMUSE_TEMPERATURE`)
    pub temperature: f32,
    /// Cap on generated tokens (`WEBMUSE_MAX_TOKENS`)
    pub max_tokens: u32,
    /// Spawn `ollama serve` if the daemon is not running (`WEBMUSE_OLLAMA_AUTOSTART`)
    pub autostart: bool,
    /// How long to wait for a spawned daemon (`WEBMUSE_OLLAMA_STARTUP_SECS`)
    pub startup_wait: Duration,
    /// Bound on each call to Ollama (`WEBMUSE_TIMEOUT_SECS`)
    pub request_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind: all_interfaces(DEFAULT_BRIDGE_PORT),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            autostart: true,
            startup_wait: Duration::from_secs(DEFAULT_OLLAMA_STARTUP_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl BridgeConfig {
    pub fn with_ollama_url(mut self, url: impl Into<String>) -> Self {
        self.ollama_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    pub fn with_startup_wait(mut self, wait: Duration) -> Self {
        self.startup_wait = wait;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            bind: parse_var(&lookup, "WEBMUSE_BRIDGE_BIND", defaults.bind)?,
            ollama_url: string_var(&lookup, "OLLAMA_URL", DEFAULT_OLLAMA_URL),
            model: string_var(&lookup, "WEBMUSE_MODEL", DEFAULT_MODEL),
            temperature: parse_var(&lookup, "WEBMUSE_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: parse_var(&lookup, "WEBMUSE_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            autostart: parse_var(&lookup, "WEBMUSE_OLLAMA_AUTOSTART", true)?,
            startup_wait: Duration::from_secs(parse_var(
                &lookup,
                "WEBMUSE_OLLAMA_STARTUP_SECS",
                DEFAULT_OLLAMA_STARTUP_SECS,
            )?),
            request_timeout: Duration::from_secs(parse_var(
                &lookup,
                "WEBMUSE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }
}

/// Swatch client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Palette service base URL (`WEBMUSE_SERVER_URL`)
    pub server_url: String,
    /// Bound on the palette request (`WEBMUSE_TIMEOUT_SECS`, doubled to cover both upstream calls)
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS * 2),
        }
    }
}

impl ClientConfig {
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let timeout_secs: u64 = parse_var(&lookup, "WEBMUSE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        Ok(Self {
            server_url: string_var(&lookup, "WEBMUSE_SERVER_URL", DEFAULT_SERVER_URL),
            request_timeout: Duration::from_secs(timeout_secs * 2),
        })
    }

    /// Full URL of the palette endpoint.
    pub fn palette_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.server_url.trim_end_matches('/'),
            crate::server::PALETTE_ROUTE
        )
    }
}
