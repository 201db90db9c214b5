use axum::{extract::State, Json};

use crate::content::ContentRecord;
use crate::state::AppState;

/// GET /api/v1/content
/// The Content Store, read-only, for the home/resume/contact pages.
pub async fn handle_get_content(State(state): State<AppState>) -> Json<ContentRecord> {
    Json(state.content.as_ref().clone())
}
