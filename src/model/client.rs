//! Model call adapter
//!
//! Iterates a fixed ordered list of candidate endpoints on the configured
//! model host, applying a per-endpoint retry/backoff policy and a payload
//! shape fallback. The per-endpoint flow is an explicit state machine
//! (chat shape, then completion shape, then exhausted) with a bounded
//! attempt counter, so the retry policy stays auditable.
//!
//! Each call is independent; the adapter holds no state between
//! invocations beyond its HTTP connection pool.

use crate::config::ModelConfig;
use crate::error::{RelayError, Result};
use crate::metrics::METRICS;
use crate::model::normalize::extract_text;
use crate::model::trim::{trim_messages, TrimLimits};
use crate::session::{ChatMessage, Role};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// HTTP statuses worth retrying against the same endpoint
const RETRYABLE_STATUSES: [u16; 7] = [408, 409, 429, 500, 502, 503, 504];

/// Message projection sent on the wire: role and content only
#[derive(Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

/// Which payload shape the current attempt is sending
enum ShapeState {
    Chat,
    Completion,
}

/// Outcome of a single attempt against one endpoint
enum Verdict {
    /// Normalized text; overall success, no further endpoints are tried
    Success(String),
    /// Endpoint does not support either shape; advance without sleeping
    Abandon(String),
    /// Transport-level failure; retry the same endpoint after backoff
    RetryTransport(String),
    /// Retryable HTTP status; retry the same endpoint after backoff
    RetryStatus(String),
    /// Terminal-looking status on both shapes; record and let the attempt
    /// loop continue
    Record(String),
}

/// Outcome of the bounded attempt loop for one endpoint
enum EndpointOutcome {
    Success(String),
    Exhausted(String),
}

/// Client for the upstream text-generation server
pub struct ModelClient {
    http: Client,
    config: ModelConfig,
    limits: TrimLimits,
    urls: Vec<String>,
}

impl ModelClient {
    /// Create a new model client
    pub fn new(config: ModelConfig, limits: TrimLimits) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RelayError::Internal(e.to_string()))?;
        let urls = config.candidate_urls();

        Ok(Self {
            http,
            config,
            limits,
            urls,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Generate a completion for a prompt.
    ///
    /// When `messages` is present and non-empty it is trimmed to the
    /// configured limits and sent as the conversation; otherwise a
    /// single-user-message conversation is synthesized from `prompt`.
    /// On total failure the error carries the last recorded diagnostic.
    pub async fn generate(
        &self,
        prompt: &str,
        messages: Option<&[ChatMessage]>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let start = Instant::now();

        let outbound = match messages {
            Some(m) if !m.is_empty() => trim_messages(m, &self.limits),
            _ => vec![ChatMessage::user(prompt)],
        };
        let wire: Vec<WireMessage> = outbound
            .iter()
            .map(|m| WireMessage {
                role: m.role,
                content: &m.content,
            })
            .collect();

        let chat_payload = json!({
            "model": self.config.model_name,
            "messages": wire,
            "max_tokens": max_tokens,
            "temperature": temperature,
        });
        let completion_payload = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": max_tokens,
                "temperature": temperature,
            },
        });

        let mut last_diag = "no candidate endpoints configured".to_string();

        for url in &self.urls {
            debug!("Trying model endpoint {}", url);
            match self
                .try_endpoint(url, &chat_payload, &completion_payload)
                .await
            {
                EndpointOutcome::Success(text) => {
                    METRICS.record_model_call(true, start.elapsed());
                    return Ok(text);
                }
                EndpointOutcome::Exhausted(diag) => {
                    warn!("Model endpoint {} exhausted: {}", url, diag);
                    last_diag = diag;
                }
            }
        }

        METRICS.record_model_call(false, start.elapsed());
        Err(RelayError::Upstream(format!(
            "Failed to contact model. Last error: {}",
            last_diag
        )))
    }

    /// Run the bounded attempt loop against one endpoint
    async fn try_endpoint(
        &self,
        url: &str,
        chat_payload: &Value,
        completion_payload: &Value,
    ) -> EndpointOutcome {
        let attempts = self.config.attempts_per_endpoint.max(1);
        let mut last_diag = format!("{} was not attempted", url);

        for attempt in 1..=attempts {
            match self.attempt_once(url, chat_payload, completion_payload).await {
                Verdict::Success(text) => return EndpointOutcome::Success(text),
                Verdict::Abandon(diag) => return EndpointOutcome::Exhausted(diag),
                Verdict::RetryStatus(diag) => {
                    warn!("Attempt {} on {} failed: {}", attempt, url, diag);
                    last_diag = diag;
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(
                            self.config.status_backoff_ms * attempt as u64,
                        ))
                        .await;
                    }
                }
                Verdict::RetryTransport(diag) => {
                    warn!("Attempt {} on {} failed: {}", attempt, url, diag);
                    last_diag = diag;
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(
                            self.config.transport_backoff_ms * attempt as u64,
                        ))
                        .await;
                    }
                }
                Verdict::Record(diag) => {
                    last_diag = diag;
                }
            }
        }

        EndpointOutcome::Exhausted(last_diag)
    }

    /// One attempt against one endpoint: chat shape first, falling back to
    /// the completion shape on a status that is neither success, not-found,
    /// nor retryable.
    async fn attempt_once(
        &self,
        url: &str,
        chat_payload: &Value,
        completion_payload: &Value,
    ) -> Verdict {
        let mut state = ShapeState::Chat;
        let mut chat_diag = String::new();

        loop {
            match state {
                ShapeState::Chat => {
                    let resp = match self.post_json(url, chat_payload).await {
                        Ok(r) => r,
                        Err(e) => return Verdict::RetryTransport(format!("{}: {}", url, e)),
                    };
                    let status = resp.status();
                    let body = match resp.text().await {
                        Ok(b) => b,
                        Err(e) => return Verdict::RetryTransport(format!("{}: {}", url, e)),
                    };

                    if status == StatusCode::OK {
                        return Verdict::Success(normalize_body(body));
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Verdict::Abandon(format!("{} returned 404 Not Found", url));
                    }
                    if RETRYABLE_STATUSES.contains(&status.as_u16()) {
                        return Verdict::RetryStatus(format!(
                            "{} returned {}: {}",
                            url,
                            status.as_u16(),
                            body
                        ));
                    }

                    // Anything else: hold on to the diagnostic and try the
                    // completion shape against the same endpoint.
                    chat_diag = format!("{} returned {}: {}", url, status.as_u16(), body);
                    state = ShapeState::Completion;
                }
                ShapeState::Completion => {
                    let resp = match self.post_json(url, completion_payload).await {
                        Ok(r) => r,
                        Err(e) => return Verdict::RetryTransport(format!("{}: {}", url, e)),
                    };
                    let status = resp.status();

                    if status == StatusCode::OK {
                        let body = match resp.text().await {
                            Ok(b) => b,
                            Err(e) => return Verdict::RetryTransport(format!("{}: {}", url, e)),
                        };
                        return Verdict::Success(normalize_body(body));
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Verdict::Abandon(format!(
                            "{} (completion shape) returned 404",
                            url
                        ));
                    }

                    // Neither shape worked; the original chat-shape status is
                    // the diagnostic worth keeping.
                    return Verdict::Record(chat_diag);
                }
            }
        }
    }

    async fn post_json(&self, url: &str, payload: &Value) -> reqwest::Result<reqwest::Response> {
        self.http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
    }
}

/// Parse a 200 body as JSON and normalize it; a non-JSON body is returned
/// verbatim.
fn normalize_body(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => extract_text(&value),
        Err(_) => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;

    #[test]
    fn test_client_creation() {
        let client = ModelClient::new(ModelConfig::default(), TrimLimits::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_candidate_urls_follow_config_order() {
        let client = ModelClient::new(ModelConfig::default(), TrimLimits::default()).unwrap();
        assert_eq!(client.urls[0], "http://127.0.0.1:5000/v1/chat/completions");
        assert_eq!(client.urls.len(), 5);
    }

    #[test]
    fn test_normalize_body_json() {
        let body = r#"{"choices":[{"message":{"content":"hi"}}]}"#.to_string();
        assert_eq!(normalize_body(body), "hi");
    }

    #[test]
    fn test_normalize_body_plain_text() {
        let body = "not json at all".to_string();
        assert_eq!(normalize_body(body), "not json at all");
    }

    #[test]
    fn test_wire_message_shape() {
        let wire = WireMessage {
            role: Role::User,
            content: "hello",
        };
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value, serde_json::json!({"role": "user", "content": "hello"}));
    }
}
