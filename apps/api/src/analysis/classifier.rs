//! Gap classifier: compares every requirement against the candidate's skills.
//!
//! Algorithm, per requirement (case-insensitive name match):
//! 1. no candidate skill → `Critical`, gap = required level
//! 2. candidate below required → `Improve`, gap = required − candidate
//! 3. candidate at/above required → `Matching`,
//!    match% = min(100, round(candidate / required × 100))
//!
//! Inputs are validated up front; nothing is computed for a malformed set.

use std::collections::{HashMap, HashSet};

use crate::analysis::salary::parse_salary_impact;
use crate::analysis::scoring::{learning_hours, months_from_hours};
use crate::errors::AppError;
use crate::models::skill::{CandidateSkill, ClassifiedSkill, Priority, SkillClass, SkillRequirement};

pub const MIN_PROFICIENCY: u8 = 1;
pub const MAX_PROFICIENCY: u8 = 5;
pub const MAX_MARKET_DEMAND: u8 = 100;

pub fn classify(
    requirements: &[SkillRequirement],
    candidate_skills: &[CandidateSkill],
) -> Result<Vec<ClassifiedSkill>, AppError> {
    validate_requirements(requirements)?;
    validate_candidate_skills(candidate_skills)?;

    let by_name: HashMap<String, &CandidateSkill> = candidate_skills
        .iter()
        .map(|c| (normalize_name(&c.name), c))
        .collect();

    Ok(requirements
        .iter()
        .map(|req| {
            let candidate = by_name
                .get(&normalize_name(&req.name))
                .map(|c| c.proficiency_level);
            classify_one(req, candidate)
        })
        .collect())
}

fn classify_one(req: &SkillRequirement, candidate: Option<u8>) -> ClassifiedSkill {
    let required = req.required_proficiency;

    let (class, proficiency_gap, match_percentage) = match candidate {
        None => (SkillClass::Critical, Some(required), None),
        Some(level) if level < required => (SkillClass::Improve, Some(required - level), None),
        Some(level) => {
            let pct = ((level as f64 / required as f64) * 100.0).round() as u32;
            (SkillClass::Matching, None, Some(pct.min(100)))
        }
    };

    let hours = learning_hours(
        class,
        req.base_learning_hours,
        proficiency_gap.unwrap_or(0),
        required,
    );

    ClassifiedSkill {
        name: req.name.clone(),
        category: req.category.clone(),
        class,
        required_proficiency: required,
        candidate_proficiency: candidate,
        market_demand: req.market_demand,
        salary_impact: parse_salary_impact(&req.salary_impact),
        learning_hours: hours,
        learning_months: months_from_hours(hours),
        match_percentage,
        proficiency_gap,
        priority: Priority::from_demand(req.market_demand),
        insight: build_insight(&req.name, class, req.market_demand, candidate, required),
    }
}

fn build_insight(name: &str, class: SkillClass, demand: u8, candidate: Option<u8>, required: u8) -> String {
    match class {
        SkillClass::Critical => format!(
            "{name} is required at level {required} and missing from your profile ({demand}% market demand)."
        ),
        SkillClass::Improve => format!(
            "You have {name} at level {}; raising it to {required} closes this gap.",
            candidate.unwrap_or(0)
        ),
        SkillClass::Matching => {
            format!("You already have {name} at the required level - maintain and deepen expertise.")
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Rejects requirement sets the classifier cannot score meaningfully.
/// A required level of 0 would make every candidate trivially matching.
pub fn validate_requirements(requirements: &[SkillRequirement]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for req in requirements {
        if req.name.trim().is_empty() {
            return Err(AppError::Validation(
                "requirement is missing a skill name".to_string(),
            ));
        }
        if !(MIN_PROFICIENCY..=MAX_PROFICIENCY).contains(&req.required_proficiency) {
            return Err(AppError::Validation(format!(
                "requirement '{}': required proficiency {} is out of range {MIN_PROFICIENCY}-{MAX_PROFICIENCY}",
                req.name, req.required_proficiency
            )));
        }
        if req.market_demand > MAX_MARKET_DEMAND {
            return Err(AppError::Validation(format!(
                "requirement '{}': market demand {} exceeds {MAX_MARKET_DEMAND}",
                req.name, req.market_demand
            )));
        }
        if !seen.insert(normalize_name(&req.name)) {
            return Err(AppError::Validation(format!(
                "requirement '{}' is listed more than once",
                req.name
            )));
        }
    }
    Ok(())
}

pub fn validate_candidate_skills(skills: &[CandidateSkill]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for skill in skills {
        if skill.name.trim().is_empty() {
            return Err(AppError::Validation(
                "candidate skill is missing a name".to_string(),
            ));
        }
        if !(MIN_PROFICIENCY..=MAX_PROFICIENCY).contains(&skill.proficiency_level) {
            return Err(AppError::Validation(format!(
                "candidate skill '{}': proficiency {} is out of range {MIN_PROFICIENCY}-{MAX_PROFICIENCY}",
                skill.name, skill.proficiency_level
            )));
        }
        if !seen.insert(normalize_name(&skill.name)) {
            return Err(AppError::Validation(format!(
                "candidate skill '{}' is listed more than once",
                skill.name
            )));
        }
    }
    Ok(())
}
