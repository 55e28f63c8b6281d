use std::sync::Arc;

use sqlx::PgPool;

use crate::session::service::SessionService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Candidate skills and analysis history.
    pub db: PgPool,
    /// Per-user session stores, backed by Redis.
    pub sessions: Arc<SessionService>,
}
