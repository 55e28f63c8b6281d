use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::roadmap::learning::{complexity, difficulty, estimate, prerequisites, LearningEstimate};

#[derive(Deserialize)]
pub struct EstimateQuery {
    pub skill: String,
    #[serde(default)]
    pub current_level: u8,
    pub target_level: u8,
}

#[derive(Serialize)]
pub struct PrerequisitesResponse {
    pub skill_name: String,
    pub prerequisites: Vec<String>,
    pub complexity_score: u8,
    pub difficulty: &'static str,
}

/// GET /api/v1/learning/estimate
pub async fn handle_estimate(
    Query(params): Query<EstimateQuery>,
) -> Result<Json<LearningEstimate>, AppError> {
    Ok(Json(estimate(
        &params.skill,
        params.current_level,
        params.target_level,
    )?))
}

/// GET /api/v1/learning/prerequisites/:skill
pub async fn handle_prerequisites(Path(skill): Path<String>) -> Json<PrerequisitesResponse> {
    let complexity = complexity(&skill);
    Json(PrerequisitesResponse {
        prerequisites: prerequisites(&skill).iter().map(|p| p.to_string()).collect(),
        complexity_score: complexity,
        difficulty: difficulty(complexity),
        skill_name: skill.trim().to_string(),
    })
}
