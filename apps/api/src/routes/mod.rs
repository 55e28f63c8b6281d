pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::roadmap::handlers as learning;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Gap analysis session
        .route(
            "/api/v1/gap-analysis/session",
            get(session::handle_get_session),
        )
        .route(
            "/api/v1/gap-analysis/analyze",
            post(session::handle_analyze),
        )
        .route(
            "/api/v1/gap-analysis/filters",
            patch(session::handle_update_filters),
        )
        .route(
            "/api/v1/gap-analysis/skills/:name/delete",
            post(session::handle_delete_skill),
        )
        .route(
            "/api/v1/gap-analysis/skills/:name/favorite",
            post(session::handle_toggle_favorite),
        )
        .route(
            "/api/v1/gap-analysis/salary-target",
            put(session::handle_set_salary_target),
        )
        .route("/api/v1/gap-analysis/clear", post(session::handle_clear))
        .route(
            "/api/v1/gap-analysis/roadmaps",
            post(session::handle_request_roadmap),
        )
        .route(
            "/api/v1/gap-analysis/history",
            get(analysis::handle_history),
        )
        // Learning catalog
        .route("/api/v1/learning/estimate", get(learning::handle_estimate))
        .route(
            "/api/v1/learning/prerequisites/:skill",
            get(learning::handle_prerequisites),
        )
        .with_state(state)
}
