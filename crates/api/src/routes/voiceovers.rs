//! Route definitions for the `/voiceovers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::voiceovers;
use crate::state::AppState;

/// Routes mounted at `/voiceovers`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(voiceovers::list))
}
