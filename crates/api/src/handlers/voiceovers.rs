//! Handlers for the voice-over catalog.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use reeltrack_records::voiceovers::VoiceOver;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /voiceovers`.
#[derive(Debug, Deserialize)]
pub struct VoiceOverParams {
    pub language: Option<String>,
    pub gender: Option<String>,
}

/// GET /api/v1/voiceovers
///
/// List voice-over profiles, optionally filtered by language and gender.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<VoiceOverParams>,
) -> AppResult<Json<DataResponse<Vec<VoiceOver>>>> {
    let profiles = state
        .tables
        .voiceovers
        .list(params.language.as_deref(), params.gender.as_deref())
        .await?;

    Ok(Json(DataResponse { data: profiles }))
}
