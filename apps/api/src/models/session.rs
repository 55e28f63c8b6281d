use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::skill::ClassifiedSkill;

/// Inputs of one Classifier + Scorer run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisParams {
    pub candidate_id: i64,
    pub role: String,
    pub category: Option<String>,
    pub experience_level: Option<String>,
}

/// The aggregate root: one persisted snapshot of a completed analysis.
/// Superseded wholesale by the next run, never merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSession {
    pub candidate_id: i64,
    pub target_role: String,
    pub category: Option<String>,
    pub experience_level: Option<String>,
    pub critical_gaps: Vec<ClassifiedSkill>,
    pub skills_to_improve: Vec<ClassifiedSkill>,
    pub matching_skills: Vec<ClassifiedSkill>,
    pub overall_match_score: u32,
    #[serde(default)]
    pub data_warnings: Vec<String>,
    pub computed_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub fn skills(&self) -> impl Iterator<Item = &ClassifiedSkill> {
        self.critical_gaps
            .iter()
            .chain(self.skills_to_improve.iter())
            .chain(self.matching_skills.iter())
    }

    /// Case-insensitive lookup across all three classes.
    pub fn find_skill(&self, name: &str) -> Option<&ClassifiedSkill> {
        let wanted = name.trim();
        self.skills().find(|s| s.name.eq_ignore_ascii_case(wanted))
    }

    pub fn total_skills(&self) -> usize {
        self.critical_gaps.len() + self.skills_to_improve.len() + self.matching_skills.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalaryTarget {
    pub amount: f64,
    pub currency: String,
}

/// Filter selections as the user last set them. `role` is the *selected* role,
/// which may differ from the analysed one until the next explicit analyze.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Filters {
    pub candidate_id: Option<i64>,
    pub role: Option<String>,
    pub category: Option<String>,
    pub experience_level: Option<String>,
    pub salary_target: Option<SalaryTarget>,
}
