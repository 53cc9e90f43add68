//! Request and response bodies for the relay API

use crate::heuristics::{PasswordReport, ScanReport};
use crate::session::{Session, SessionSummary};
use serde::{Deserialize, Serialize};

/// API error body with a stable error code
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Stable error codes surfaced by the API
pub mod error_codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsListResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummaryResponse {
    pub session: SessionSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenameResponse {
    pub renamed: bool,
    pub session: SessionSummary,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// Prompt text; `message` is accepted as an alias
    pub prompt: Option<String>,
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// The effective prompt, preferring `prompt` over `message`
    pub fn prompt_text(&self) -> &str {
        self.prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.message.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub model_reachable: bool,
    pub sessions_count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct PasswordCheckRequest {
    #[serde(default)]
    pub password: String,
}

pub type PasswordCheckResponse = PasswordReport;

#[derive(Debug, Default, Deserialize)]
pub struct ScanTextRequest {
    #[serde(default)]
    pub text: String,
}

pub type ScanTextResponse = ScanReport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text_prefers_prompt() {
        let req = ChatRequest {
            prompt: Some("a".to_string()),
            message: Some("b".to_string()),
            ..Default::default()
        };
        assert_eq!(req.prompt_text(), "a");
    }

    #[test]
    fn test_prompt_text_falls_back_to_message() {
        let req = ChatRequest {
            prompt: Some("".to_string()),
            message: Some("b".to_string()),
            ..Default::default()
        };
        assert_eq!(req.prompt_text(), "b");

        let req = ChatRequest::default();
        assert_eq!(req.prompt_text(), "");
    }
}
