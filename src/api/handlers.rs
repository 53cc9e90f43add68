//! HTTP handlers for the relay API

use super::models::*;
use crate::config::RelayConfig;
use crate::heuristics;
use crate::metrics::METRICS;
use crate::model::ModelClient;
use crate::session::{ChatMessage, SessionStore};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub model: Arc<ModelClient>,
}

impl AppState {
    /// Build application state from configuration
    pub fn from_config(config: &RelayConfig) -> crate::error::Result<Self> {
        let model = ModelClient::new(config.model.clone(), config.trim.clone())?;
        Ok(Self {
            sessions: Arc::new(SessionStore::new()),
            model: Arc::new(model),
        })
    }
}

type HandlerError = (StatusCode, Json<ApiError>);

fn not_found(id: &str) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(
            error_codes::NOT_FOUND,
            format!("Unknown session: {}", id),
        )),
    )
}

/// List sessions, oldest first
///
/// GET /api/sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsListResponse> {
    Json(SessionsListResponse {
        sessions: state.sessions.list(),
    })
}

/// Create a session
///
/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Json<SessionSummaryResponse> {
    let session = state.sessions.create(request.name);
    METRICS.record_session_created();
    Json(SessionSummaryResponse {
        session: session.summary(),
    })
}

/// Fetch a full session including messages
///
/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, HandlerError> {
    match state.sessions.get(&id) {
        Some(session) => Ok(Json(SessionResponse { session })),
        None => Err(not_found(&id)),
    }
}

/// Delete a session
///
/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HandlerError> {
    if state.sessions.delete(&id) {
        Ok(Json(DeleteResponse { deleted: true }))
    } else {
        Err(not_found(&id))
    }
}

/// Rename a session. Rejects empty or whitespace-only names without
/// touching the existing name.
///
/// PATCH /api/sessions/:id
pub async fn rename_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<RenameResponse>, HandlerError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                error_codes::VALIDATION_ERROR,
                "Name cannot be empty",
            )),
        ));
    }

    if !state.sessions.rename(&id, name) {
        return Err(not_found(&id));
    }

    // rename succeeded, so the session exists
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(RenameResponse {
        renamed: true,
        session: session.summary(),
    }))
}

/// Forward a chat prompt to the model server.
///
/// Auto-creates a session when `session_id` is missing or unknown, appends
/// the user message, calls the model with the trimmed history, and appends
/// the assistant reply. An upstream failure is surfaced as an
/// error-annotated assistant message, not an HTTP failure, so the
/// conversation stays well-formed.
///
/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let prompt = request.prompt_text().to_string();
    if prompt.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                error_codes::VALIDATION_ERROR,
                "Missing prompt or message",
            )),
        ));
    }

    let model_config = state.model.config();
    let max_tokens = request.max_tokens.unwrap_or(model_config.default_max_tokens);

    let session_id = match request
        .session_id
        .as_deref()
        .filter(|id| state.sessions.contains(id))
    {
        Some(id) => id.to_string(),
        None => {
            let session = state.sessions.create(None);
            METRICS.record_session_created();
            session.id
        }
    };

    info!("Chat request for session {}", session_id);

    state
        .sessions
        .append_message(&session_id, ChatMessage::user(prompt.clone()));

    // Snapshot of the history; the adapter trims its own bounded copy
    let history = state
        .sessions
        .get(&session_id)
        .map(|s| s.messages)
        .unwrap_or_default();

    let assistant_text = match state
        .model
        .generate(&prompt, Some(&history), max_tokens, model_config.temperature)
        .await
    {
        Ok(text) => {
            METRICS.record_chat_request(true);
            text
        }
        Err(e) => {
            METRICS.record_chat_request(false);
            warn!("Model call failed for session {}: {}", session_id, e);
            format!("[Model error] {}", e)
        }
    };

    state
        .sessions
        .append_message(&session_id, ChatMessage::assistant(assistant_text.clone()));

    Ok(Json(ChatResponse {
        session_id,
        response: assistant_text,
    }))
}

/// Clear a session's message history
///
/// POST /api/session/clear
pub async fn clear_session(
    State(state): State<AppState>,
    Json(request): Json<ClearRequest>,
) -> Result<Json<ClearResponse>, HandlerError> {
    if state.sessions.clear_messages(&request.session_id) {
        Ok(Json(ClearResponse { cleared: true }))
    } else {
        Err(not_found(&request.session_id))
    }
}

/// Score a password's strength
///
/// POST /api/password-check
pub async fn password_check(
    Json(request): Json<PasswordCheckRequest>,
) -> Json<PasswordCheckResponse> {
    Json(heuristics::password_strength(&request.password))
}

/// Scan text for suspicious markers
///
/// POST /api/scan-text
pub async fn scan_text(Json(request): Json<ScanTextRequest>) -> Json<ScanTextResponse> {
    Json(heuristics::scan_text(&request.text))
}

/// Probe the model server with a trivial prompt and report reachability
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let temperature = state.model.config().temperature;
    let reachable = state.model.generate("Hello", None, 5, temperature).await.is_ok();

    Json(HealthResponse {
        model_reachable: reachable,
        sessions_count: state.sessions.count(),
    })
}

/// Export metrics in Prometheus text format
///
/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}
