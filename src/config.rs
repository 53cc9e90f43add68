//! Configuration for the relay server and the upstream model client

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::model::trim::TrimLimits;

/// Upstream model client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base host of the model server
    #[serde(default = "default_host")]
    pub host: String,

    /// Candidate endpoint path suffixes, tried in listed order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Model name sent in the chat-shape payload
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per candidate endpoint
    #[serde(default = "default_attempts")]
    pub attempts_per_endpoint: u32,

    /// Base backoff after a retryable HTTP status, in milliseconds
    /// (multiplied by the attempt number)
    #[serde(default = "default_status_backoff_ms")]
    pub status_backoff_ms: u64,

    /// Base backoff after a transport-level failure, in milliseconds
    /// (multiplied by the attempt number)
    #[serde(default = "default_transport_backoff_ms")]
    pub transport_backoff_ms: u64,

    /// Default completion token budget when the caller does not provide one
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

// Default value functions
fn default_host() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_endpoints() -> Vec<String> {
    [
        "/v1/chat/completions",
        "/v1/completions",
        "/predict",
        "/v1/generate",
        "/v1/complete",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_model_name() -> String {
    "local-model".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_attempts() -> u32 {
    3
}
fn default_status_backoff_ms() -> u64 {
    600
}
fn default_transport_backoff_ms() -> u64 {
    500
}
fn default_max_tokens() -> u32 {
    256
}
fn default_temperature() -> f32 {
    0.2
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            endpoints: default_endpoints(),
            model_name: default_model_name(),
            timeout_secs: default_timeout_secs(),
            attempts_per_endpoint: default_attempts(),
            status_backoff_ms: default_status_backoff_ms(),
            transport_backoff_ms: default_transport_backoff_ms(),
            default_max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl ModelConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full candidate URLs in priority order
    pub fn candidate_urls(&self) -> Vec<String> {
        let host = self.host.trim_end_matches('/');
        self.endpoints
            .iter()
            .map(|ep| format!("{}{}", host, ep))
            .collect()
    }
}

/// Top-level relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub trim: TrimLimits,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5001".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            model: ModelConfig::default(),
            trim: TrimLimits::default(),
        }
    }
}

impl RelayConfig {
    /// Load configuration overrides from environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("RELAY_BIND_ADDR") {
            self.bind_addr = val;
        }

        if let Ok(val) = std::env::var("MODEL_HOST") {
            self.model.host = val;
        }

        if let Ok(val) = std::env::var("MODEL_NAME") {
            self.model.model_name = val;
        }

        if let Ok(val) = std::env::var("MODEL_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.model.timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("MODEL_RETRY_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                self.model.attempts_per_endpoint = attempts;
            }
        }

        if let Ok(val) = std::env::var("MODEL_STATUS_BACKOFF_MS") {
            if let Ok(ms) = val.parse() {
                self.model.status_backoff_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("MODEL_TRANSPORT_BACKOFF_MS") {
            if let Ok(ms) = val.parse() {
                self.model.transport_backoff_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("MODEL_MAX_TOKENS") {
            if let Ok(tokens) = val.parse() {
                self.model.default_max_tokens = tokens;
            }
        }

        if let Ok(val) = std::env::var("TRIM_MAX_MESSAGES") {
            if let Ok(count) = val.parse() {
                self.trim.max_count = count;
            }
        }

        if let Ok(val) = std::env::var("TRIM_MAX_MESSAGE_CHARS") {
            if let Ok(chars) = val.parse() {
                self.trim.max_msg_chars = chars;
            }
        }

        if let Ok(val) = std::env::var("TRIM_MAX_TOTAL_CHARS") {
            if let Ok(chars) = val.parse() {
                self.trim.max_total_chars = chars;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:5001");
        assert_eq!(config.model.host, "http://127.0.0.1:5000");
        assert_eq!(config.model.timeout_secs, 60);
        assert_eq!(config.model.attempts_per_endpoint, 3);
        assert_eq!(config.model.endpoints.len(), 5);
        assert_eq!(config.model.endpoints[0], "/v1/chat/completions");
    }

    #[test]
    fn test_candidate_urls_strip_trailing_slash() {
        let config = ModelConfig {
            host: "http://localhost:5000/".to_string(),
            ..Default::default()
        };
        let urls = config.candidate_urls();
        assert_eq!(urls[0], "http://localhost:5000/v1/chat/completions");
        assert_eq!(urls[4], "http://localhost:5000/v1/complete");
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("MODEL_HOST", "http://custom:9000");
        std::env::set_var("MODEL_RETRY_ATTEMPTS", "5");

        let config = RelayConfig::default().from_env();

        assert_eq!(config.model.host, "http://custom:9000");
        assert_eq!(config.model.attempts_per_endpoint, 5);

        // Cleanup
        std::env::remove_var("MODEL_HOST");
        std::env::remove_var("MODEL_RETRY_ATTEMPTS");
    }

    #[test]
    fn test_timeout_conversion() {
        let config = ModelConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }
}
