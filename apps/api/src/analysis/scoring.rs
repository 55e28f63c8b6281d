use crate::models::skill::{ClassifiedSkill, SkillClass};

/// Critical gaps counted towards projected salary impact.
pub const CRITICAL_SALARY_TOP_N: usize = 5;
/// Skills-to-improve counted towards projected salary impact.
pub const IMPROVE_SALARY_TOP_N: usize = 3;

pub const HOURS_PER_MONTH: u32 = 40;

/// A skill must represent at least this share of the target package delta.
pub const SALARY_TARGET_FRACTION: f64 = 0.05;
/// Target salaries arrive in whole currency units; impacts are quoted per 100 000 (lakhs).
pub const SALARY_UNIT_DIVISOR: f64 = 100_000.0;

/// Demand-weighted requirement coverage, 0 – 100.
///
/// Each skill contributes `coverage × market_demand` to the numerator and
/// `market_demand` to the denominator: matching skills count fully, improve
/// skills count `candidate / required`, critical gaps count nothing.
pub fn overall_match_score(skills: &[ClassifiedSkill]) -> u32 {
    let total_weight: f64 = skills.iter().map(|s| s.market_demand as f64).sum();
    if total_weight <= 0.0 {
        return 0;
    }

    let covered: f64 = skills
        .iter()
        .map(|s| s.coverage() * s.market_demand as f64)
        .sum();

    ((covered / total_weight) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Remaining study hours for one requirement.
pub fn learning_hours(class: SkillClass, base_hours: u32, proficiency_gap: u8, required: u8) -> u32 {
    match class {
        SkillClass::Critical => base_hours,
        SkillClass::Improve => {
            let required = required.max(1) as u64;
            ((base_hours as u64 * proficiency_gap as u64).div_ceil(required)) as u32
        }
        SkillClass::Matching => 0,
    }
}

/// `ceil(hours / 40)`, never displayed below one month.
pub fn months_from_hours(hours: u32) -> u32 {
    hours.div_ceil(HOURS_PER_MONTH).max(1)
}

/// Sums the salary impact of the `top_n` highest-impact skills that are not excluded.
/// Exclusion happens before ranking, so a deleted skill frees its slot.
pub fn top_salary_impact<'a, I, F>(skills: I, top_n: usize, is_excluded: F) -> f64
where
    I: IntoIterator<Item = &'a ClassifiedSkill>,
    F: Fn(&ClassifiedSkill) -> bool,
{
    let mut impacts: Vec<f64> = skills
        .into_iter()
        .filter(|s| !is_excluded(s))
        .map(|s| s.salary_impact)
        .collect();
    impacts.sort_by(|a, b| b.total_cmp(a));
    impacts.into_iter().take(top_n).sum()
}

/// Minimum impact a skill needs to pass a salary target.
pub fn salary_threshold(target_salary: f64) -> f64 {
    SALARY_TARGET_FRACTION * target_salary / SALARY_UNIT_DIVISOR
}

/// Salary-target filter predicate. No target lets every skill through.
pub fn passes_salary_target(salary_impact: f64, target_salary: Option<f64>) -> bool {
    match target_salary {
        Some(target) => salary_impact >= salary_threshold(target),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skill::Priority;

    fn skill(name: &str, class: SkillClass, required: u8, candidate: Option<u8>, demand: u8, impact: f64) -> ClassifiedSkill {
        ClassifiedSkill {
            name: name.to_string(),
            category: "Other".to_string(),
            class,
            required_proficiency: required,
            candidate_proficiency: candidate,
            market_demand: demand,
            salary_impact: impact,
            learning_hours: 0,
            learning_months: 1,
            match_percentage: None,
            proficiency_gap: None,
            priority: Priority::from_demand(demand),
            insight: String::new(),
        }
    }

    #[test]
    fn test_score_matching_vs_critical() {
        // Kubernetes (critical, 90) + React (matching, 95) → 95 / 185
        let skills = vec![
            skill("Kubernetes", SkillClass::Critical, 4, None, 90, 5.0),
            skill("React", SkillClass::Matching, 3, Some(4), 95, 2.0),
        ];
        assert_eq!(overall_match_score(&skills), 51);
    }

    #[test]
    fn test_score_partial_credit_for_improve() {
        // React improve at 2/3: 95 × 2/3 / 185 = 34.2 → 34
        let skills = vec![
            skill("Kubernetes", SkillClass::Critical, 4, None, 90, 5.0),
            skill("React", SkillClass::Improve, 3, Some(2), 95, 2.0),
        ];
        assert_eq!(overall_match_score(&skills), 34);
    }

    #[test]
    fn test_score_empty_or_zero_demand_is_zero() {
        assert_eq!(overall_match_score(&[]), 0);
        let skills = vec![skill("Soft Skills", SkillClass::Matching, 1, Some(1), 0, 0.0)];
        assert_eq!(overall_match_score(&skills), 0);
    }

    #[test]
    fn test_learning_hours_by_class() {
        assert_eq!(learning_hours(SkillClass::Critical, 200, 4, 4), 200);
        // 200 × 1 / 3 = 66.7 → 67
        assert_eq!(learning_hours(SkillClass::Improve, 200, 1, 3), 67);
        assert_eq!(learning_hours(SkillClass::Matching, 200, 0, 3), 0);
    }

    #[test]
    fn test_months_rounding_and_floor() {
        assert_eq!(months_from_hours(0), 1);
        assert_eq!(months_from_hours(40), 1);
        assert_eq!(months_from_hours(41), 2);
        assert_eq!(months_from_hours(200), 5);
    }

    #[test]
    fn test_top_n_takes_highest_and_skips_excluded() {
        let skills: Vec<_> = [9.0, 1.0, 7.0, 3.0, 5.0, 8.0, 2.0]
            .iter()
            .enumerate()
            .map(|(i, v)| skill(&format!("s{i}"), SkillClass::Critical, 3, None, 50, *v))
            .collect();

        // top 5 of {9,8,7,5,3}
        assert_eq!(top_salary_impact(&skills, 5, |_| false), 32.0);
        // excluding the 9 lets the 2 in
        assert_eq!(top_salary_impact(&skills, 5, |s| s.name == "s0"), 25.0);
        assert_eq!(top_salary_impact(&skills, 3, |_| false), 24.0);
    }

    #[test]
    fn test_salary_target_threshold() {
        // ₹20,00,000 target → 0.05 × 2_000_000 / 100_000 = 1.0 lakh minimum
        assert_eq!(salary_threshold(2_000_000.0), 1.0);
        assert!(passes_salary_target(1.0, Some(2_000_000.0)));
        assert!(!passes_salary_target(0.9, Some(2_000_000.0)));
        assert!(passes_salary_target(0.0, None));
    }
}
