use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::history::{clamp_limit, list_analyses, SavedAnalysisRow};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub candidate_id: i64,
    pub limit: Option<i64>,
}

/// GET /api/v1/gap-analysis/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<SavedAnalysisRow>>, AppError> {
    let rows = list_analyses(&state.db, params.candidate_id, clamp_limit(params.limit)).await?;
    Ok(Json(rows))
}
