//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login           -> login
/// POST /signup          -> signup
/// POST /reset-password          -> reset_password
/// POST /reset-password/confirm  -> confirm_reset
/// POST /logout                  -> logout (requires auth)
/// GET  /me                      -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/reset-password", post(auth::reset_password))
        .route("/reset-password/confirm", post(auth::confirm_reset))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}
