use std::sync::Arc;

use crate::auth::reset::Mailer;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Typed tables of the record backend.
    pub tables: reeltrack_records::Tables,
    /// Server configuration (JWT secret, CORS, timeouts).
    pub config: Arc<ServerConfig>,
    /// Password-reset mailer; `None` when SMTP is not configured.
    pub mailer: Option<Arc<Mailer>>,
}
