use serde::Serialize;

use crate::analysis::scoring::{
    passes_salary_target, top_salary_impact, CRITICAL_SALARY_TOP_N, IMPROVE_SALARY_TOP_N,
};
use crate::models::session::{AnalysisSession, Filters};
use crate::models::skill::ClassifiedSkill;
use crate::session::ledger::SkillLedger;

/// A classified skill as the presentation layer sees it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillView {
    #[serde(flatten)]
    pub skill: ClassifiedSkill,
    pub is_favorite: bool,
    /// Set between the two phases of a soft delete, so the client can fade the row out.
    pub pending_removal: bool,
}

/// Read model recomputed after every ledger or filter mutation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisSessionView {
    pub target_role: Option<String>,
    pub overall_match_score: u32,
    pub critical_gaps: Vec<SkillView>,
    pub skills_to_improve: Vec<SkillView>,
    pub matching_skills: Vec<SkillView>,
    pub total_salary_impact: f64,
    pub is_loading: bool,
    pub error: Option<String>,
    pub favorites: Vec<String>,
    pub deleted: Vec<String>,
    /// Skills between the two phases of a soft delete.
    pub pending_removal: Vec<String>,
    pub filters: Filters,
    pub data_warnings: Vec<String>,
}

/// Borrowed parts of the session store the view is derived from.
pub struct ViewInputs<'a> {
    pub session: Option<&'a AnalysisSession>,
    pub filters: &'a Filters,
    pub deleted: &'a SkillLedger,
    pub favorites: &'a SkillLedger,
    pub is_pending: &'a dyn Fn(&str) -> bool,
    pub is_loading: bool,
    pub error: Option<&'a str>,
}

/// Derives the view: deleted skills are dropped everywhere, the salary target
/// (if any) filters every list, and salary impact sums the top 5 visible
/// critical gaps plus the top 3 visible skills to improve.
pub fn build_view(inputs: ViewInputs<'_>) -> AnalysisSessionView {
    let target = inputs.filters.salary_target.as_ref().map(|t| t.amount);

    let visible = |skill: &ClassifiedSkill| {
        !inputs.deleted.contains(&skill.name) && passes_salary_target(skill.salary_impact, target)
    };

    let project = |skills: &[ClassifiedSkill]| -> Vec<SkillView> {
        skills
            .iter()
            .filter(|s| visible(s))
            .map(|s| SkillView {
                skill: s.clone(),
                is_favorite: inputs.favorites.contains(&s.name),
                pending_removal: (inputs.is_pending)(&s.name),
            })
            .collect()
    };

    let (critical_gaps, skills_to_improve, matching_skills, score, warnings, role) =
        match inputs.session {
            Some(session) => (
                project(&session.critical_gaps),
                project(&session.skills_to_improve),
                project(&session.matching_skills),
                session.overall_match_score,
                session.data_warnings.clone(),
                Some(session.target_role.clone()),
            ),
            None => (vec![], vec![], vec![], 0, vec![], None),
        };

    let pending_removal = critical_gaps
        .iter()
        .chain(&skills_to_improve)
        .chain(&matching_skills)
        .filter(|s| s.pending_removal)
        .map(|s| s.skill.name.clone())
        .collect();

    let total_salary_impact = inputs
        .session
        .map(|session| {
            let hidden = |s: &ClassifiedSkill| !visible(s);
            top_salary_impact(&session.critical_gaps, CRITICAL_SALARY_TOP_N, hidden)
                + top_salary_impact(&session.skills_to_improve, IMPROVE_SALARY_TOP_N, hidden)
        })
        .unwrap_or(0.0);

    AnalysisSessionView {
        target_role: role,
        overall_match_score: score,
        critical_gaps,
        skills_to_improve,
        matching_skills,
        total_salary_impact: (total_salary_impact * 100.0).round() / 100.0,
        is_loading: inputs.is_loading,
        error: inputs.error.map(str::to_string),
        favorites: inputs.favorites.names(),
        deleted: inputs.deleted.names(),
        pending_removal,
        filters: inputs.filters.clone(),
        data_warnings: warnings,
    }
}
