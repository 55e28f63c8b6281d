/// Keyword → category table used when upstream records omit a category.
/// Earlier rows win, so overlapping keywords (e.g. `aws`) resolve to the first listed category.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Programming Languages",
        &["python", "javascript", "java", "c++", "c#", "go", "rust", "typescript"],
    ),
    (
        "Frontend",
        &["react", "vue", "angular", "html5", "css3", "tailwind", "bootstrap"],
    ),
    (
        "Backend",
        &["django", "flask", "fastapi", "spring", "nodejs", "node.js", "express", ".net"],
    ),
    (
        "Devops",
        &["docker", "kubernetes", "terraform", "jenkins", "gitlab", "circleci", "aws", "gcp"],
    ),
    (
        "Cloud",
        &["azure", "ec2", "s3", "lambda", "firestore"],
    ),
    (
        "Databases",
        &["sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch"],
    ),
    (
        "Data",
        &["machine learning", "deep learning", "tensorflow", "pytorch", "data science"],
    ),
    ("Tools", &["git", "jira", "slack", "figma", "adobe"]),
];

pub const FALLBACK_CATEGORY: &str = "Other";

/// Derives a display category from a skill name.
///
/// Single-word keywords must match a whole token so `go` does not claim
/// `MongoDB` or `Django`; multi-word keywords match as a phrase.
pub fn categorize(skill_name: &str) -> &'static str {
    let lower = skill_name.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || c == '/' || c == ',' || c == '(' || c == ')')
        .filter(|t| !t.is_empty())
        .collect();

    for (category, keywords) in CATEGORY_KEYWORDS {
        let hit = keywords.iter().any(|kw| {
            if kw.contains(' ') {
                lower.contains(kw)
            } else {
                tokens.iter().any(|t| t == kw)
            }
        });
        if hit {
            return *category;
        }
    }

    FALLBACK_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_skills() {
        assert_eq!(categorize("Python"), "Programming Languages");
        assert_eq!(categorize("React"), "Frontend");
        assert_eq!(categorize("Kubernetes"), "Devops");
        assert_eq!(categorize("PostgreSQL"), "Databases");
        assert_eq!(categorize("Deep Learning"), "Data");
        assert_eq!(categorize("Git"), "Tools");
    }

    #[test]
    fn test_short_keyword_does_not_match_inside_words() {
        assert_eq!(categorize("MongoDB"), "Databases");
        assert_eq!(categorize("Django"), "Backend");
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(categorize("Negotiation"), FALLBACK_CATEGORY);
        assert_eq!(categorize(""), FALLBACK_CATEGORY);
    }
}
