//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{projects, variations};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET  /                          -> list (?org= scopes one organization)
/// GET  /{code}                    -> get_by_code
/// POST /{code}/approve            -> approve
/// POST /{code}/variations/quote   -> quote_variations
/// POST /{code}/variations         -> submit_variations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list))
        .route("/{code}", get(projects::get_by_code))
        .route("/{code}/approve", post(projects::approve))
        .route(
            "/{code}/variations/quote",
            post(variations::quote_variations),
        )
        .route("/{code}/variations", post(variations::submit_variations))
}
