use serde::Serialize;

use crate::errors::AppError;

pub const DEFAULT_COMPLEXITY: u8 = 3;
pub const HOURS_PER_LEVEL_UNIT: u32 = 30;
pub const STUDY_HOURS_PER_WEEK: u32 = 10;
const WEEKS_PER_MONTH: f64 = 4.33;

/// Learning complexity on a 1 – 5 scale.
const SKILL_COMPLEXITY: &[(&str, u8)] = &[
    ("HTML5", 1),
    ("CSS3", 1),
    ("CSS", 1),
    ("Tailwind CSS", 1),
    ("JavaScript", 2),
    ("TypeScript", 2),
    ("Web Design", 2),
    ("React", 3),
    ("Vue.js", 3),
    ("Next.js", 3),
    ("Redux", 3),
    ("Angular", 4),
    ("Python", 2),
    ("Express.js", 2),
    ("REST APIs", 2),
    ("FastAPI", 2),
    ("Flask", 2),
    ("Go", 2),
    ("PHP", 2),
    ("Node.js", 3),
    ("GraphQL", 3),
    ("Django", 3),
    ("Java", 3),
    (".NET", 3),
    ("Spring Boot", 4),
    ("Rust", 4),
    ("SQL", 2),
    ("MongoDB", 2),
    ("MySQL", 2),
    ("Redis", 2),
    ("Firebase", 2),
    ("PostgreSQL", 3),
    ("Elasticsearch", 3),
    ("GitHub Actions", 2),
    ("Docker", 3),
    ("Terraform", 3),
    ("CI/CD", 3),
    ("Jenkins", 3),
    ("Linux", 3),
    ("Networking", 3),
    ("Kubernetes", 4),
    ("AWS", 4),
    ("Azure", 4),
    ("GCP", 4),
    ("Pandas", 2),
    ("NumPy", 2),
    ("Tableau", 2),
    ("Power BI", 2),
    ("Data Analysis", 3),
    ("Statistics", 3),
    ("Scikit-learn", 3),
    ("Machine Learning", 5),
    ("Deep Learning", 5),
    ("TensorFlow", 5),
    ("PyTorch", 5),
    ("NLP", 5),
    ("Computer Vision", 5),
    ("Manual Testing", 1),
    ("Jest", 2),
    ("Pytest", 2),
    ("Cypress", 2),
    ("API Testing", 2),
    ("Selenium", 3),
    ("Test Automation", 3),
    ("Git", 1),
    ("GitHub", 1),
    ("GitLab", 1),
    ("Agile", 1),
    ("Scrum", 1),
    ("JIRA", 1),
    ("Communication", 1),
    ("Project Management", 2),
    ("Authentication", 2),
    ("Microservices", 4),
    ("Security", 4),
    ("System Design", 5),
    ("Blockchain", 5),
];

const PREREQUISITES: &[(&str, &[&str])] = &[
    ("React", &["JavaScript", "HTML5", "CSS3"]),
    ("Vue.js", &["JavaScript", "HTML5", "CSS3"]),
    ("Angular", &["JavaScript", "TypeScript", "HTML5", "CSS3"]),
    ("Next.js", &["React", "Node.js", "JavaScript"]),
    ("TypeScript", &["JavaScript"]),
    ("Redux", &["React", "JavaScript"]),
    ("Tailwind CSS", &["CSS3"]),
    ("Node.js", &["JavaScript"]),
    ("Express.js", &["Node.js", "JavaScript"]),
    ("FastAPI", &["Python"]),
    ("Django", &["Python"]),
    ("Flask", &["Python"]),
    ("Spring Boot", &["Java"]),
    ("GraphQL", &["REST APIs", "Backend fundamentals"]),
    ("REST APIs", &["Backend fundamentals"]),
    ("PostgreSQL", &["SQL", "Database fundamentals"]),
    ("MongoDB", &["Database fundamentals"]),
    ("Redis", &["Database fundamentals"]),
    ("Docker", &["Linux"]),
    ("Kubernetes", &["Docker", "Linux", "Container fundamentals"]),
    ("AWS", &["Cloud fundamentals", "Linux", "Networking"]),
    ("Azure", &["Cloud fundamentals", "Networking"]),
    ("GCP", &["Cloud fundamentals", "Networking"]),
    ("Terraform", &["Cloud fundamentals", "Infrastructure as Code"]),
    ("CI/CD", &["Git", "Linux"]),
    ("Jenkins", &["CI/CD", "Linux"]),
    ("Machine Learning", &["Python", "Statistics", "Mathematics", "Data Analysis"]),
    ("Deep Learning", &["Machine Learning", "Python", "Linear Algebra"]),
    ("TensorFlow", &["Python", "Machine Learning"]),
    ("PyTorch", &["Python", "Machine Learning"]),
    ("NLP", &["Machine Learning", "Python"]),
    ("Computer Vision", &["Machine Learning", "Python"]),
    ("Data Analysis", &["SQL", "Python"]),
    ("Selenium", &["Test Automation"]),
    ("Cypress", &["Test Automation", "JavaScript"]),
    ("Jest", &["JavaScript"]),
    ("Pytest", &["Python"]),
    ("System Design", &["Backend fundamentals", "Databases", "Networking"]),
    ("Microservices", &["Backend fundamentals", "Docker"]),
    ("Blockchain", &["Cryptography", "System Design"]),
    ("Security", &["Networking", "Linux"]),
];

pub fn complexity(skill: &str) -> u8 {
    let skill = skill.trim();
    SKILL_COMPLEXITY
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(skill))
        .map(|(_, c)| *c)
        .unwrap_or(DEFAULT_COMPLEXITY)
}

pub fn prerequisites(skill: &str) -> &'static [&'static str] {
    let skill = skill.trim();
    PREREQUISITES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(skill))
        .map(|(_, p)| *p)
        .unwrap_or(&[])
}

pub fn difficulty(complexity: u8) -> &'static str {
    match complexity {
        0..=2 => "Easy",
        3 => "Intermediate",
        4 => "Advanced",
        _ => "Expert",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningEstimate {
    pub skill_name: String,
    pub current_level: u8,
    pub target_level: u8,
    pub estimated_hours: u32,
    pub estimated_weeks: String,
    pub estimated_months: String,
    pub difficulty: &'static str,
    pub complexity_score: u8,
    pub prerequisites: Vec<String>,
    pub study_hours_per_week: u32,
}

/// Estimates study time from `current_level` (0 – 5) to `target_level` (1 – 5),
/// at 30 hours per level per complexity point and 10 study hours a week.
pub fn estimate(skill: &str, current_level: u8, target_level: u8) -> Result<LearningEstimate, AppError> {
    let skill = skill.trim();
    if skill.is_empty() {
        return Err(AppError::Validation("skill cannot be empty".to_string()));
    }
    if current_level > 5 || !(1..=5).contains(&target_level) {
        return Err(AppError::Validation(format!(
            "levels for '{skill}' must be current 0-5 and target 1-5"
        )));
    }
    if current_level >= target_level {
        return Err(AppError::Validation(format!(
            "target level must be greater than current level for '{skill}'"
        )));
    }

    let complexity = complexity(skill);
    let hours = (target_level - current_level) as u32 * complexity as u32 * HOURS_PER_LEVEL_UNIT;
    let weeks = hours as f64 / STUDY_HOURS_PER_WEEK as f64;

    Ok(LearningEstimate {
        skill_name: skill.to_string(),
        current_level,
        target_level,
        estimated_hours: hours,
        estimated_weeks: week_band(weeks),
        estimated_months: month_band(weeks),
        difficulty: difficulty(complexity),
        complexity_score: complexity,
        prerequisites: prerequisites(skill).iter().map(|p| p.to_string()).collect(),
        study_hours_per_week: STUDY_HOURS_PER_WEEK,
    })
}

fn week_band(weeks: f64) -> String {
    let w = weeks as u32;
    if weeks < 4.0 {
        format!("{}-{} weeks", w, w + 1)
    } else if weeks < 12.0 {
        format!("{}-{} weeks", w, w + 2)
    } else {
        format!("{}-{} weeks", w, w + 4)
    }
}

fn month_band(weeks: f64) -> String {
    let months = weeks / WEEKS_PER_MONTH;
    let m = months as u32;
    if months < 1.0 {
        format!("{}-{} weeks", weeks as u32, weeks as u32 + 2)
    } else if months < 3.0 {
        format!("{}-{} months", m, m + 1)
    } else {
        format!("{}-{} months", m, m + 2)
    }
}
