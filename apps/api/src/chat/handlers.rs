//! Axum route handlers for the Chat API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::resolver::Strategy;
use crate::chat::session::SharedSession;
use crate::chat::transcript::TranscriptEntry;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub greeting: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub reply: String,
    pub strategy: Strategy,
    pub degraded: bool,
    pub transcript_len: usize,
}

#[derive(Debug, Deserialize)]
pub struct SessionConfigRequest {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Chat session {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/chat/quick-questions
pub async fn handle_quick_questions(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.content.quick_questions())
}

/// POST /api/v1/chat/sessions
///
/// Starts a session with the process-level resolver config (env credential, if any).
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create(state.default_resolver_config()).await;
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            greeting: state.content.greeting(),
        }),
    )
}

/// DELETE /api/v1/chat/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Chat session {id} not found")))
    }
}

/// POST /api/v1/chat/sessions/:id/messages
///
/// Blank messages are rejected with 400 and leave the transcript alone.
/// A failed remote call still answers 200 with the apology and `degraded: true`.
pub async fn handle_ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut session = session.lock().await;

    let reply = session.ask(&state.resolver, &request.message).await?;

    Ok(Json(AskResponse {
        reply: reply.text,
        strategy: reply.strategy,
        degraded: reply.degraded,
        transcript_len: session.transcript.len(),
    }))
}

/// GET /api/v1/chat/sessions/:id/transcript
pub async fn handle_get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TranscriptEntry>>, AppError> {
    let session = find_session(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(session.transcript.all().to_vec()))
}

/// DELETE /api/v1/chat/sessions/:id/transcript
pub async fn handle_reset_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id).await?;
    let mut session = session.lock().await;
    if !session.transcript.is_empty() {
        info!(session_id = %id, entries = session.transcript.len(), "Chat transcript reset");
        session.transcript.reset();
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/chat/sessions/:id/config
///
/// Session-scoped credential and model. Omitted fields fall back to the process defaults;
/// a blank key switches the session to the local responder.
pub async fn handle_update_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SessionConfigRequest>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id).await?;
    let defaults = state.default_resolver_config();

    let mut session = session.lock().await;
    session.config.api_key = request.api_key.or(defaults.api_key);
    session.config.model = request.model.or(defaults.model);
    info!(session_id = %id, mode = ?session.config.mode(), "Chat session config updated");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/chat/sessions/:id/export?format=json|markdown
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let session = find_session(&state, id).await?;
    let session = session.lock().await;

    let response = match params.format {
        ExportFormat::Json => (
            [(
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"conversation.json\"",
            )],
            Json(session.transcript.export_json()),
        )
            .into_response(),
        ExportFormat::Markdown => (
            [
                (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"portfolio_chat_export.md\"",
                ),
            ],
            session
                .transcript
                .export_markdown(&state.content.personal.name),
        )
            .into_response(),
    };

    Ok(response)
}
