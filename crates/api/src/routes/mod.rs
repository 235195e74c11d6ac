pub mod auth;
pub mod dashboard;
pub mod health;
pub mod projects;
pub mod voiceovers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                        login (public)
/// /auth/signup                       signup (public)
/// /auth/reset-password               request reset mail (public)
/// /auth/reset-password/confirm       consume token, set new password (public)
/// /auth/logout                       logout (requires auth)
/// /auth/me                           current profile (requires auth)
///
/// /projects                          entitled listing (?org= scopes one organization)
/// /projects/{code}                   detail with per-section review states
/// /projects/{code}/approve           approve current phase (POST)
/// /projects/{code}/variations/quote  price a selection (POST)
/// /projects/{code}/variations        submit a variation request (POST)
///
/// /voiceovers                        catalog (?language=&gender=)
///
/// /dashboard/stats                   aggregate statistics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .nest("/voiceovers", voiceovers::router())
        .nest("/dashboard", dashboard::router())
}
