use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::analysis::history::record_analysis;
use crate::errors::AppError;
use crate::models::session::{AnalysisParams, SalaryTarget};
use crate::session::service::{AnalyzeOutcome, FilterUpdate};
use crate::session::store::RoadmapOutcome;
use crate::session::view::AnalysisSessionView;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub params: AnalysisParams,
}

#[derive(Deserialize)]
pub struct FiltersRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub update: FilterUpdate,
}

/// `salary_target: null` removes the target.
#[derive(Deserialize)]
pub struct SalaryTargetRequest {
    pub user_id: Uuid,
    pub salary_target: Option<SalaryTarget>,
}

#[derive(Deserialize)]
pub struct RoadmapRequest {
    pub user_id: Uuid,
    pub skill_name: String,
    /// Inferred from the skill's class in the current session when omitted.
    pub is_improvement: Option<bool>,
}

/// Writes the history row for an applied analysis in the background, even when
/// the session record could not be saved. History is best-effort and never
/// fails the request.
fn spawn_history(state: &AppState, outcome: &AnalyzeOutcome) {
    if let Some(session) = outcome.applied.clone() {
        let db = state.db.clone();
        tokio::spawn(async move {
            if let Err(e) = record_analysis(&db, &session).await {
                warn!(
                    "Failed to record analysis history for candidate {}: {e:#}",
                    session.candidate_id
                );
            }
        });
    }
}

/// GET /api/v1/gap-analysis/session
pub async fn handle_get_session(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisSessionView>, AppError> {
    Ok(Json(state.sessions.view(params.user_id).await?))
}

/// POST /api/v1/gap-analysis/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisSessionView>, AppError> {
    let outcome = state.sessions.analyze(req.user_id, req.params).await?;
    spawn_history(&state, &outcome);
    Ok(Json(outcome.into_view()?))
}

/// PATCH /api/v1/gap-analysis/filters
pub async fn handle_update_filters(
    State(state): State<AppState>,
    Json(req): Json<FiltersRequest>,
) -> Result<Json<AnalysisSessionView>, AppError> {
    let outcome = state.sessions.update_filters(req.user_id, req.update).await?;
    spawn_history(&state, &outcome);
    Ok(Json(outcome.into_view()?))
}

/// POST /api/v1/gap-analysis/skills/:name/delete
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisSessionView>, AppError> {
    Ok(Json(state.sessions.soft_delete(params.user_id, &name).await?))
}

/// POST /api/v1/gap-analysis/skills/:name/favorite
pub async fn handle_toggle_favorite(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisSessionView>, AppError> {
    Ok(Json(state.sessions.toggle_favorite(params.user_id, &name).await?))
}

/// PUT /api/v1/gap-analysis/salary-target
pub async fn handle_set_salary_target(
    State(state): State<AppState>,
    Json(req): Json<SalaryTargetRequest>,
) -> Result<Json<AnalysisSessionView>, AppError> {
    Ok(Json(
        state
            .sessions
            .set_salary_target(req.user_id, req.salary_target)
            .await?,
    ))
}

/// POST /api/v1/gap-analysis/clear
pub async fn handle_clear(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisSessionView>, AppError> {
    Ok(Json(state.sessions.clear_all(params.user_id).await?))
}

/// POST /api/v1/gap-analysis/roadmaps
/// 201 when a roadmap was created, 200 with a warning when one already existed.
pub async fn handle_request_roadmap(
    State(state): State<AppState>,
    Json(req): Json<RoadmapRequest>,
) -> Result<(StatusCode, Json<RoadmapOutcome>), AppError> {
    let outcome = state
        .sessions
        .request_roadmap(req.user_id, &req.skill_name, req.is_improvement)
        .await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}
