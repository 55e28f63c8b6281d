// Skill gap analysis engine.
// Pipeline: normalize upstream records → classify → score → AnalysisSession snapshot.
// Everything here is synchronous and pure apart from the history module.

pub mod category;
pub mod classifier;
pub mod handlers;
pub mod history;
pub mod normalize;
pub mod salary;
pub mod scoring;

use chrono::Utc;
use tracing::{debug, warn};

use crate::analysis::classifier::classify;
use crate::analysis::normalize::{normalize_requirements, RawRequirement};
use crate::analysis::salary::is_malformed;
use crate::analysis::scoring::overall_match_score;
use crate::errors::AppError;
use crate::models::session::{AnalysisParams, AnalysisSession};
use crate::models::skill::{CandidateSkill, ClassifiedSkill, SkillClass};

/// Runs one full Classifier + Scorer pass and packages the result as a new session.
/// Any validation failure aborts the run without producing a partial snapshot.
pub fn run_analysis(
    params: &AnalysisParams,
    raw_requirements: Vec<RawRequirement>,
    candidate_skills: &[CandidateSkill],
) -> Result<AnalysisSession, AppError> {
    let requirements = normalize_requirements(raw_requirements)?;

    let data_warnings: Vec<String> = requirements
        .iter()
        .filter(|r| is_malformed(&r.salary_impact))
        .map(|r| {
            warn!(
                "Unparseable salary impact {:?} for skill '{}', counting it as 0",
                r.salary_impact, r.name
            );
            format!(
                "Salary impact for '{}' could not be read and was counted as 0",
                r.name
            )
        })
        .collect();

    let classified = classify(&requirements, candidate_skills)?;
    let overall_match_score = overall_match_score(&classified);

    let (critical_gaps, skills_to_improve, matching_skills) = partition_by_class(classified);

    debug!(
        "Analysis for candidate {} against '{}': {} critical, {} improve, {} matching, score {}",
        params.candidate_id,
        params.role,
        critical_gaps.len(),
        skills_to_improve.len(),
        matching_skills.len(),
        overall_match_score
    );

    Ok(AnalysisSession {
        candidate_id: params.candidate_id,
        target_role: params.role.clone(),
        category: params.category.clone(),
        experience_level: params.experience_level.clone(),
        critical_gaps,
        skills_to_improve,
        matching_skills,
        overall_match_score,
        data_warnings,
        computed_at: Utc::now(),
    })
}

/// Splits classified skills into the three lists, each ordered by salary impact
/// (highest first) and then by market demand.
fn partition_by_class(
    classified: Vec<ClassifiedSkill>,
) -> (Vec<ClassifiedSkill>, Vec<ClassifiedSkill>, Vec<ClassifiedSkill>) {
    let mut critical = Vec::new();
    let mut improve = Vec::new();
    let mut matching = Vec::new();

    for skill in classified {
        match skill.class {
            SkillClass::Critical => critical.push(skill),
            SkillClass::Improve => improve.push(skill),
            SkillClass::Matching => matching.push(skill),
        }
    }

    let by_impact = |a: &ClassifiedSkill, b: &ClassifiedSkill| {
        b.salary_impact
            .total_cmp(&a.salary_impact)
            .then(b.market_demand.cmp(&a.market_demand))
    };
    critical.sort_by(by_impact);
    improve.sort_by(by_impact);
    matching.sort_by(|a, b| b.market_demand.cmp(&a.market_demand));

    (critical, improve, matching)
}
