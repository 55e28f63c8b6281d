// Upstream data sources for an analysis run.
// Requirements come either from the requirements service (HTTP) or from the
// on-disk role catalog; candidate skills come from Postgres.

pub mod candidates;
pub mod catalog;
pub mod http;

use async_trait::async_trait;

use crate::analysis::normalize::RawRequirement;
use crate::errors::AppError;
use crate::models::skill::CandidateSkill;

/// Supplies the required skills of a role, un-normalized.
#[async_trait]
pub trait RequirementSource: Send + Sync {
    async fn get_requirements(
        &self,
        role: &str,
        category: Option<&str>,
        experience_level: Option<&str>,
    ) -> Result<Vec<RawRequirement>, AppError>;
}

/// Supplies the skills a candidate already has.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn get_candidate_skills(&self, candidate_id: i64) -> Result<Vec<CandidateSkill>, AppError>;
}
