//! Router construction

use super::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the relay router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/api/sessions/:id",
            get(handlers::get_session)
                .delete(handlers::delete_session)
                .patch(handlers::rename_session),
        )
        .route("/api/chat", post(handlers::chat))
        .route("/api/session/clear", post(handlers::clear_session))
        .route("/api/password-check", post(handlers::password_check))
        .route("/api/scan-text", post(handlers::scan_text))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
