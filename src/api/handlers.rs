//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    DraftRequest, DraftResponse, ErrorResponse, HealthResponse, QuickReplyRequest, SubmitRequest,
    SubmitResponse,
};
use super::AppState;
use crate::runtime::SessionView;
use crate::state_machine::Event;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Snapshot
        .route("/api/session", get(get_session))
        // SSE streaming
        .route("/api/session/stream", get(stream_session))
        // User actions
        .route("/api/session/submit", post(submit))
        .route("/api/session/quick-reply", post(quick_reply))
        .route("/api/session/draft", put(edit_draft))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ============================================================
// Session
// ============================================================

async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.view())
}

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before taking the snapshot so nothing falls between them
    let broadcast_rx = state.session.subscribe();
    let view = state.session.view();
    sse_stream(view, broadcast_rx)
}

// ============================================================
// User Actions
// ============================================================

async fn submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    if state.session.view().status.loading && !req.text.trim().is_empty() {
        return Err(AppError::Conflict(
            "Please wait for the current answer".to_string(),
        ));
    }

    tracing::debug!(text_len = req.text.len(), "Submission received");

    state
        .session
        .send_event(Event::user_submit(req.text))
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(SubmitResponse { queued: true }))
}

async fn quick_reply(
    State(state): State<AppState>,
    Json(req): Json<QuickReplyRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let status = state.session.view().status;
    // Topics are only offered once the name is known; earlier picks are ignored
    let draft = if status.user_name.is_some() {
        req.topic.clone()
    } else {
        status.draft
    };

    state
        .session
        .send_event(Event::QuickReplySelected { topic: req.topic })
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(DraftResponse { draft }))
}

async fn edit_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let draft = req.text.clone();

    state
        .session
        .send_event(Event::DraftEdited { text: req.text })
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(DraftResponse { draft }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    Conflict(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
