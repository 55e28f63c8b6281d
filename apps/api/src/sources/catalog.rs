//! On-disk role catalog.
//!
//! Layout of `role_requirements.json`:
//!
//! ```json
//! {
//!   "roles": [
//!     { "role_name": "DevOps Engineer", "category": "Cloud",
//!       "required_skills": { "Kubernetes": { "min_proficiency": 4 } },
//!       "optional_skills": { "Go": { "min_proficiency": 2 } } }
//!   ],
//!   "market_data": {
//!     "kubernetes": { "demand_score": 90, "salary_impact": "₹5.0L", "learning_hours": 180 }
//!   }
//! }
//! ```
//!
//! Required skills default to proficiency 3 and demand 75, optional skills to
//! proficiency 2 and demand 60. The experience level shifts every required
//! proficiency by one step, clamped to 1–5.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::analysis::normalize::RawRequirement;
use crate::errors::AppError;
use crate::models::skill::SalaryImpact;
use crate::sources::RequirementSource;

const REQUIRED_DEFAULT_PROFICIENCY: u32 = 3;
const REQUIRED_DEFAULT_DEMAND: u32 = 75;
const OPTIONAL_DEFAULT_PROFICIENCY: u32 = 2;
const OPTIONAL_DEFAULT_DEMAND: u32 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct RoleCatalog {
    #[serde(default)]
    roles: Vec<RoleEntry>,
    #[serde(default)]
    market_data: HashMap<String, MarketEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct RoleEntry {
    role_name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    required_skills: BTreeMap<String, SkillEntry>,
    #[serde(default)]
    optional_skills: BTreeMap<String, SkillEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SkillEntry {
    #[serde(default)]
    min_proficiency: Option<u32>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MarketEntry {
    #[serde(default)]
    demand_score: Option<u32>,
    #[serde(default)]
    salary_impact: Option<SalaryImpact>,
    #[serde(default)]
    learning_hours: Option<u32>,
}

impl RoleCatalog {
    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: RoleCatalog =
            serde_json::from_str(raw).context("Role catalog is not valid JSON")?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read role catalog at {}", path.display()))?;
        let catalog = Self::from_json(&raw)?;
        info!(
            "Loaded role catalog from {} ({} roles, {} market entries)",
            path.display(),
            catalog.roles.len(),
            catalog.market_data.len()
        );
        debug!("Catalog roles: {:?}", catalog.role_names());
        Ok(catalog)
    }

    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.role_name.as_str()).collect()
    }

    /// Picks the role by name (case-insensitive). When several roles share a
    /// name the category decides; otherwise the first match wins.
    fn find_role(&self, role: &str, category: Option<&str>) -> Option<&RoleEntry> {
        let mut candidates = self
            .roles
            .iter()
            .filter(|r| r.role_name.eq_ignore_ascii_case(role.trim()));

        match category {
            Some(category) => {
                let all: Vec<&RoleEntry> = candidates.collect();
                all.iter()
                    .find(|r| {
                        r.category
                            .as_deref()
                            .is_some_and(|c| c.eq_ignore_ascii_case(category.trim()))
                    })
                    .or_else(|| all.first())
                    .copied()
            }
            None => candidates.next(),
        }
    }

    pub fn requirements_for(
        &self,
        role: &str,
        category: Option<&str>,
        experience_level: Option<&str>,
    ) -> Result<Vec<RawRequirement>, AppError> {
        let entry = self
            .find_role(role, category)
            .ok_or_else(|| AppError::NotFound(format!("role '{role}' is not in the role catalog")))?;

        let shift = experience_shift(experience_level);

        let required = entry.required_skills.iter().map(|(name, skill)| {
            let base = skill.min_proficiency.unwrap_or(REQUIRED_DEFAULT_PROFICIENCY);
            self.raw_requirement(name, skill, shift_proficiency(base, shift), REQUIRED_DEFAULT_DEMAND)
        });
        let optional = entry.optional_skills.iter().map(|(name, skill)| {
            let base = skill.min_proficiency.unwrap_or(OPTIONAL_DEFAULT_PROFICIENCY);
            self.raw_requirement(name, skill, base, OPTIONAL_DEFAULT_DEMAND)
        });

        let requirements: Vec<RawRequirement> = required.chain(optional).collect();
        debug!(
            "Role catalog: {} requirements for '{}' (experience shift {})",
            requirements.len(),
            entry.role_name,
            shift
        );
        Ok(requirements)
    }

    fn raw_requirement(
        &self,
        name: &str,
        skill: &SkillEntry,
        proficiency: u32,
        default_demand: u32,
    ) -> RawRequirement {
        let market = self
            .market_data
            .get(&name.trim().to_lowercase())
            .cloned()
            .unwrap_or_default();

        RawRequirement {
            name: Some(name.to_string()),
            category: skill.category.clone(),
            required_proficiency: Some(f64::from(proficiency)),
            market_demand: Some(f64::from(market.demand_score.unwrap_or(default_demand))),
            salary_impact: market.salary_impact,
            base_learning_hours: market.learning_hours.map(f64::from),
        }
    }
}

/// Entry/Junior lower the bar by one step, Senior/Lead raise it by one.
fn experience_shift(experience_level: Option<&str>) -> i32 {
    match experience_level.map(|e| e.trim().to_lowercase()).as_deref() {
        Some("entry") | Some("junior") | Some("entry level") => -1,
        Some("senior") | Some("lead") | Some("principal") => 1,
        _ => 0,
    }
}

fn shift_proficiency(base: u32, shift: i32) -> u32 {
    (base as i32 + shift).clamp(1, 5) as u32
}

#[async_trait]
impl RequirementSource for RoleCatalog {
    async fn get_requirements(
        &self,
        role: &str,
        category: Option<&str>,
        experience_level: Option<&str>,
    ) -> Result<Vec<RawRequirement>, AppError> {
        self.requirements_for(role, category, experience_level)
    }
}
