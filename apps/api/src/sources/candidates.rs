use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::errors::AppError;
use crate::models::skill::CandidateSkill;
use crate::sources::CandidateSource;

const SOURCE_NAME: &str = "Candidate skill store";

#[derive(Debug, FromRow)]
struct CandidateSkillRow {
    skill_name: String,
    proficiency_level: i32,
    last_used: Option<NaiveDate>,
}

impl TryFrom<CandidateSkillRow> for CandidateSkill {
    type Error = AppError;

    fn try_from(row: CandidateSkillRow) -> Result<Self, Self::Error> {
        let proficiency_level = u8::try_from(row.proficiency_level).map_err(|_| {
            AppError::Validation(format!(
                "candidate skill '{}': proficiency {} is out of range 1-5",
                row.skill_name, row.proficiency_level
            ))
        })?;
        Ok(CandidateSkill {
            name: row.skill_name,
            proficiency_level,
            last_used: row.last_used,
        })
    }
}

/// Reads extracted resume skills from the `candidate_skills` table.
#[derive(Clone)]
pub struct PgCandidateSource {
    pool: PgPool,
}

impl PgCandidateSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateSource for PgCandidateSource {
    async fn get_candidate_skills(&self, candidate_id: i64) -> Result<Vec<CandidateSkill>, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM candidates WHERE id = $1)")
            .bind(candidate_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::upstream(SOURCE_NAME, e))?;

        if !exists {
            return Err(AppError::NotFound(format!("candidate {candidate_id} does not exist")));
        }

        let rows = sqlx::query_as::<_, CandidateSkillRow>(
            r#"
            SELECT skill_name, proficiency_level, last_used
            FROM candidate_skills
            WHERE candidate_id = $1
            ORDER BY skill_name
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::upstream(SOURCE_NAME, e))?;

        debug!("Loaded {} skills for candidate {candidate_id}", rows.len());
        rows.into_iter().map(CandidateSkill::try_from).collect()
    }
}
