use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Salary impact as delivered upstream: either a plain number or a
/// localized currency string such as `"₹4.2L"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SalaryImpact {
    Amount(f64),
    Text(String),
}

impl From<f64> for SalaryImpact {
    fn from(value: f64) -> Self {
        SalaryImpact::Amount(value)
    }
}

impl From<&str> for SalaryImpact {
    fn from(value: &str) -> Self {
        SalaryImpact::Text(value.to_string())
    }
}

/// One required skill of a target role. Immutable per analysis request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillRequirement {
    pub name: String,
    pub category: String,
    /// 1 – 5
    pub required_proficiency: u8,
    /// 0 – 100
    pub market_demand: u8,
    pub salary_impact: SalaryImpact,
    pub base_learning_hours: u32,
}

/// A skill the candidate already has, as produced by resume extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateSkill {
    pub name: String,
    /// 1 – 5
    pub proficiency_level: u8,
    pub last_used: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillClass {
    /// Required skill entirely absent from the candidate profile.
    Critical,
    /// Present, but below the required proficiency.
    Improve,
    /// Present at or above the required proficiency.
    Matching,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_demand(market_demand: u8) -> Self {
        if market_demand >= 80 {
            Priority::High
        } else if market_demand >= 50 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// Canonical classified skill. Every downstream consumer reads this one shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedSkill {
    pub name: String,
    pub category: String,
    pub class: SkillClass,
    pub required_proficiency: u8,
    pub candidate_proficiency: Option<u8>,
    pub market_demand: u8,
    /// Parsed numeric impact; malformed upstream values land here as 0.
    pub salary_impact: f64,
    pub learning_hours: u32,
    pub learning_months: u32,
    /// Matching skills only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<u32>,
    /// Critical and improve skills only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proficiency_gap: Option<u8>,
    pub priority: Priority,
    pub insight: String,
}

impl ClassifiedSkill {
    /// Fraction of the requirement the candidate already covers (0.0 – 1.0).
    pub fn coverage(&self) -> f64 {
        match self.class {
            SkillClass::Matching => 1.0,
            SkillClass::Critical => 0.0,
            SkillClass::Improve => {
                let candidate = self.candidate_proficiency.unwrap_or(0) as f64;
                (candidate / self.required_proficiency.max(1) as f64).clamp(0.0, 1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_impact_deserializes_number_or_string() {
        let number: SalaryImpact = serde_json::from_str("4.2").unwrap();
        assert_eq!(number, SalaryImpact::Amount(4.2));

        let text: SalaryImpact = serde_json::from_str("\"₹4.2L\"").unwrap();
        assert_eq!(text, SalaryImpact::Text("₹4.2L".to_string()));
    }

    #[test]
    fn test_priority_bands() {
        assert_eq!(Priority::from_demand(95), Priority::High);
        assert_eq!(Priority::from_demand(80), Priority::High);
        assert_eq!(Priority::from_demand(60), Priority::Medium);
        assert_eq!(Priority::from_demand(10), Priority::Low);
    }
}
