use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Reports service version and whether Postgres answers. Redis is checked
/// implicitly by every session request.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "ok",
        Err(e) => {
            warn!("Health check: database unreachable: {e}");
            "unreachable"
        }
    };
    let status = if database == "ok" { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "skillgap-api",
        "database": database
    }))
}
