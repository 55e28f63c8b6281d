//! Roadmap generator: fixed-template learning plans for a single skill.
//!
//! Pure template instantiation: the same `(skill, is_improvement)` always yields
//! the same phases. Improvement plans have 3 phases, new-skill plans have 4.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::roadmap::learning;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    pub number: u8,
    pub title: String,
    pub min_weeks: u32,
    pub max_weeks: u32,
    pub duration: String,
    pub description: String,
    pub objectives: Vec<String>,
    pub resources: Vec<String>,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Roadmap {
    pub skill_name: String,
    pub is_improvement: bool,
    pub phases: Vec<Phase>,
    pub total_min_weeks: u32,
    pub total_max_weeks: u32,
    pub difficulty: String,
    pub prerequisites: Vec<String>,
    pub created_at: DateTime<Utc>,
}

struct PhaseTemplate {
    title: &'static str,
    weeks: (u32, u32),
    description: &'static str,
    objectives: &'static [&'static str],
    resources: &'static [&'static str],
    projects: &'static [&'static str],
}

const IMPROVEMENT_PLAN: &[PhaseTemplate] = &[
    PhaseTemplate {
        title: "Practice & Strengthen",
        weeks: (2, 4),
        description: "Close the gaps in your existing {skill} knowledge through deliberate practice.",
        objectives: &[
            "Review {skill} fundamentals you use least often",
            "Solve practice problems that target weak areas",
            "Refactor an existing project using idiomatic {skill}",
        ],
        resources: &["Official {skill} documentation", "Practice exercises and katas"],
        projects: &["Rebuild a small tool you know well using {skill}"],
    },
    PhaseTemplate {
        title: "Advanced Techniques",
        weeks: (3, 5),
        description: "Learn the advanced {skill} patterns used in production systems.",
        objectives: &[
            "Study advanced {skill} patterns and trade-offs",
            "Apply performance and debugging techniques",
        ],
        resources: &["Advanced {skill} courses", "Conference talks and engineering blogs"],
        projects: &["Add a non-trivial feature to a {skill} codebase"],
    },
    PhaseTemplate {
        title: "Expert Mastery",
        weeks: (4, 6),
        description: "Reach expert-level {skill} proficiency and share it with others.",
        objectives: &[
            "Design a system end to end with {skill}",
            "Review others' {skill} code",
            "Contribute to a {skill} open-source project",
        ],
        resources: &["{skill} source code and RFCs", "Community forums"],
        projects: &[
            "Publish a {skill} library or write-up",
            "Mentor someone learning {skill}",
        ],
    },
];

const NEW_SKILL_PLAN: &[PhaseTemplate] = &[
    PhaseTemplate {
        title: "Foundation",
        weeks: (2, 3),
        description: "Learn core {skill} concepts and set up a working environment.",
        objectives: &[
            "Install and configure {skill} tooling",
            "Understand the core {skill} concepts and vocabulary",
        ],
        resources: &["Beginner {skill} course", "Official {skill} getting-started guide"],
        projects: &["Complete a hello-world {skill} tutorial"],
    },
    PhaseTemplate {
        title: "Intermediate Practice",
        weeks: (3, 4),
        description: "Build small {skill} applications and learn common patterns.",
        objectives: &[
            "Use common {skill} patterns and best practices",
            "Debug and test {skill} code",
            "Read well-written {skill} projects",
        ],
        resources: &["Intermediate {skill} tutorials", "Community Q&A and Discord servers"],
        projects: &["Build a small {skill} project from scratch"],
    },
    PhaseTemplate {
        title: "Advanced Application",
        weeks: (4, 6),
        description: "Apply {skill} to realistic, production-like problems.",
        objectives: &[
            "Integrate {skill} into a multi-component system",
            "Handle performance, security and deployment concerns",
        ],
        resources: &["Advanced {skill} books", "Case studies from production teams"],
        projects: &["Ship a portfolio project that relies on {skill}"],
    },
    PhaseTemplate {
        title: "Mastery & Optimization",
        weeks: (3, 5),
        description: "Optimize {skill} usage and demonstrate mastery.",
        objectives: &[
            "Profile and optimize {skill} workloads",
            "Document architecture decisions involving {skill}",
        ],
        resources: &["{skill} performance guides", "Certification or assessment material"],
        projects: &[
            "Optimize an existing {skill} project and measure the gain",
            "Write a technical post about {skill}",
        ],
    },
];

/// Instantiates the phase template for `skill`.
pub fn generate_phases(skill: &str, is_improvement: bool) -> Result<Vec<Phase>, AppError> {
    let skill = skill.trim();
    if skill.is_empty() {
        return Err(AppError::Validation(
            "cannot generate a roadmap for an empty skill name".to_string(),
        ));
    }

    let plan = if is_improvement {
        IMPROVEMENT_PLAN
    } else {
        NEW_SKILL_PLAN
    };

    let fill = |items: &[&str]| -> Vec<String> {
        items.iter().map(|t| t.replace("{skill}", skill)).collect()
    };

    Ok(plan
        .iter()
        .enumerate()
        .map(|(i, t)| Phase {
            number: i as u8 + 1,
            title: t.title.to_string(),
            min_weeks: t.weeks.0,
            max_weeks: t.weeks.1,
            duration: format!("{}-{} weeks", t.weeks.0, t.weeks.1),
            description: t.description.replace("{skill}", skill),
            objectives: fill(t.objectives),
            resources: fill(t.resources),
            projects: fill(t.projects),
        })
        .collect())
}

/// Builds a full roadmap: phases plus learning-catalog context.
pub fn build_roadmap(skill: &str, is_improvement: bool) -> Result<Roadmap, AppError> {
    let phases = generate_phases(skill, is_improvement)?;
    let skill = skill.trim();
    let complexity = learning::complexity(skill);

    Ok(Roadmap {
        skill_name: skill.to_string(),
        is_improvement,
        total_min_weeks: phases.iter().map(|p| p.min_weeks).sum(),
        total_max_weeks: phases.iter().map(|p| p.max_weeks).sum(),
        phases,
        difficulty: learning::difficulty(complexity).to_string(),
        prerequisites: learning::prerequisites(skill)
            .iter()
            .map(|p| p.to_string())
            .collect(),
        created_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improvement_plan_has_three_phases() {
        let phases = generate_phases("React", true).unwrap();
        let titles: Vec<_> = phases.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Practice & Strengthen", "Advanced Techniques", "Expert Mastery"]
        );
    }

    #[test]
    fn test_new_skill_plan_has_four_phases() {
        let phases = generate_phases("Kubernetes", false).unwrap();
        let titles: Vec<_> = phases.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Foundation",
                "Intermediate Practice",
                "Advanced Application",
                "Mastery & Optimization"
            ]
        );
        assert_eq!(phases[0].number, 1);
        assert_eq!(phases[3].number, 4);
    }

    #[test]
    fn test_phase_shape_is_fixed() {
        for is_improvement in [true, false] {
            for phase in generate_phases("Rust", is_improvement).unwrap() {
                assert!((2..=3).contains(&phase.objectives.len()), "{}", phase.title);
                assert!(!phase.resources.is_empty());
                assert!(!phase.projects.is_empty());
                assert!(phase.min_weeks < phase.max_weeks);
                assert_eq!(
                    phase.duration,
                    format!("{}-{} weeks", phase.min_weeks, phase.max_weeks)
                );
            }
        }
    }

    #[test]
    fn test_skill_name_is_interpolated() {
        let phases = generate_phases("Terraform", false).unwrap();
        assert!(phases[0].description.contains("Terraform"));
        assert!(phases
            .iter()
            .flat_map(|p| p.objectives.iter())
            .all(|o| !o.contains("{skill}")));
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(
            generate_phases("Docker", true).unwrap(),
            generate_phases("Docker", true).unwrap()
        );
    }

    #[test]
    fn test_blank_skill_is_rejected() {
        assert!(matches!(
            generate_phases("   ", false),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_roadmap_totals_and_prerequisites() {
        let roadmap = build_roadmap("Kubernetes", false).unwrap();
        assert_eq!(roadmap.total_min_weeks, 2 + 3 + 4 + 3);
        assert_eq!(roadmap.total_max_weeks, 3 + 4 + 6 + 5);
        assert_eq!(roadmap.difficulty, "Advanced");
        assert!(roadmap.prerequisites.contains(&"Docker".to_string()));
    }
}
