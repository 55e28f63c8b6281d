//! Boundary normalization for upstream requirement records.
//!
//! Upstream sources name the same field several ways (`salary_impact`,
//! `salaryImpact`, ...) and omit fields freely. Everything is mapped onto the
//! canonical `SkillRequirement` here, once, so the classifier and scorer never
//! branch on optional or aliased fields.
//!
//! Numeric fields are read as plain JSON numbers so that a negative or
//! fractional value reaches the range checks below and is reported as a
//! validation error naming the skill and field.

use serde::{Deserialize, Serialize};

use crate::analysis::category::categorize;
use crate::analysis::salary::derive_salary_impact;
use crate::errors::AppError;
use crate::models::skill::{SalaryImpact, SkillRequirement};

pub const DEFAULT_REQUIRED_PROFICIENCY: f64 = 3.0;
pub const DEFAULT_MARKET_DEMAND: f64 = 75.0;

/// A requirement exactly as an upstream source delivers it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawRequirement {
    #[serde(alias = "skill_name", alias = "skillName")]
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(
        alias = "requiredProficiencyLevel",
        alias = "required_proficiency_level",
        alias = "requiredProficiency",
        alias = "min_proficiency"
    )]
    pub required_proficiency: Option<f64>,
    #[serde(alias = "marketDemand", alias = "demand_score")]
    pub market_demand: Option<f64>,
    #[serde(alias = "salaryImpact")]
    pub salary_impact: Option<SalaryImpact>,
    #[serde(
        alias = "baseLearningHours",
        alias = "learning_hours",
        alias = "learningTime"
    )]
    pub base_learning_hours: Option<f64>,
}

/// Proficiency levels are discrete: fractional or negative values are rejected.
/// Range 1-5 is enforced by the classifier.
fn proficiency_level(name: &str, value: f64) -> Result<u8, AppError> {
    if !value.is_finite() || value.fract() != 0.0 || !(0.0..=u8::MAX as f64).contains(&value) {
        return Err(AppError::Validation(format!(
            "requirement '{name}': required_proficiency {value} is not a level 1-5"
        )));
    }
    Ok(value as u8)
}

/// Demand is a percentage score; fractional values are rounded.
fn demand_score(name: &str, value: f64) -> Result<u8, AppError> {
    let rounded = value.round();
    if !rounded.is_finite() || !(0.0..=u8::MAX as f64).contains(&rounded) {
        return Err(AppError::Validation(format!(
            "requirement '{name}': market_demand {value} is out of range 0-100"
        )));
    }
    Ok(rounded as u8)
}

fn learning_hours(name: &str, value: f64) -> Result<u32, AppError> {
    let rounded = value.round();
    if !rounded.is_finite() || !(0.0..=u32::MAX as f64).contains(&rounded) {
        return Err(AppError::Validation(format!(
            "requirement '{name}': base_learning_hours {value} cannot be negative"
        )));
    }
    Ok(rounded as u32)
}

/// Normalizes one raw record. Defaults follow the market-data conventions:
/// proficiency 3, demand 75, learning hours `clamp(demand × 2, 50, 300)`,
/// and a demand-derived salary impact when none is supplied.
pub fn normalize_requirement(raw: RawRequirement) -> Result<SkillRequirement, AppError> {
    let name = raw
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("requirement is missing a skill name".to_string()))?;

    let required_proficiency = proficiency_level(
        &name,
        raw.required_proficiency.unwrap_or(DEFAULT_REQUIRED_PROFICIENCY),
    )?;
    let market_demand = demand_score(&name, raw.market_demand.unwrap_or(DEFAULT_MARKET_DEMAND))?;

    let category = raw
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| categorize(&name).to_string());

    let salary_impact = match raw.salary_impact {
        Some(SalaryImpact::Amount(v)) if v == 0.0 => {
            SalaryImpact::Amount(derive_salary_impact(market_demand, 0, required_proficiency))
        }
        Some(impact) => impact,
        None => SalaryImpact::Amount(derive_salary_impact(market_demand, 0, required_proficiency)),
    };

    let base_learning_hours = match raw.base_learning_hours {
        Some(hours) => learning_hours(&name, hours)?,
        None => (market_demand as u32 * 2).clamp(50, 300),
    };

    Ok(SkillRequirement {
        name,
        category,
        required_proficiency,
        market_demand,
        salary_impact,
        base_learning_hours,
    })
}

pub fn normalize_requirements(raw: Vec<RawRequirement>) -> Result<Vec<SkillRequirement>, AppError> {
    raw.into_iter().map(normalize_requirement).collect()
}
