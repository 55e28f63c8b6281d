use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::session::AnalysisSession;

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const MAX_HISTORY_LIMIT: i64 = 50;

/// Summary row written once per completed analysis.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedAnalysisRow {
    pub id: Uuid,
    pub candidate_id: i64,
    pub target_role: String,
    pub match_score: i32,
    pub critical_gaps: i32,
    pub skills_to_improve: i32,
    pub created_at: DateTime<Utc>,
}

/// Appends a summary of `session` to the candidate's analysis history.
/// Append-only: rows are never updated.
pub async fn record_analysis(pool: &PgPool, session: &AnalysisSession) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO saved_gap_analyses
            (id, candidate_id, target_role, match_score, critical_gaps, skills_to_improve, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(session.candidate_id)
    .bind(&session.target_role)
    .bind(session.overall_match_score as i32)
    .bind(session.critical_gaps.len() as i32)
    .bind(session.skills_to_improve.len() as i32)
    .bind(session.computed_at)
    .execute(pool)
    .await?;

    info!(
        "Recorded gap analysis {id} for candidate {} ({})",
        session.candidate_id, session.target_role
    );
    Ok(id)
}

/// Returns the candidate's most recent analyses, newest first.
pub async fn list_analyses(
    pool: &PgPool,
    candidate_id: i64,
    limit: i64,
) -> Result<Vec<SavedAnalysisRow>> {
    Ok(sqlx::query_as::<_, SavedAnalysisRow>(
        r#"
        SELECT id, candidate_id, target_role, match_score, critical_gaps, skills_to_improve, created_at
        FROM saved_gap_analyses
        WHERE candidate_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(candidate_id)
    .bind(clamp_limit(Some(limit)))
    .fetch_all(pool)
    .await?)
}

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_and_bounds() {
        assert_eq!(clamp_limit(None), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), 50);
        assert_eq!(clamp_limit(Some(25)), 25);
    }
}
