/// Client for the role requirements service.
///
/// `GET {base_url}/requirements?role=&category=&experience_level=` returns either a
/// bare JSON array of requirement records or `{ "requirements": [...] }`.
/// Retries on 429 and 5xx with exponential backoff; everything else fails fast.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::normalize::RawRequirement;
use crate::errors::AppError;
use crate::sources::RequirementSource;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 15;
const SOURCE_NAME: &str = "Role requirement service";

#[derive(Debug, Error)]
pub enum RequirementsClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("requirements service returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The body arrived but is not a requirement list. Retrying cannot help.
    #[error("malformed requirements payload: {0}")]
    Malformed(String),

    #[error("role '{0}' is unknown to the requirements service")]
    UnknownRole(String),

    #[error("gave up after {retries} retries")]
    Exhausted { retries: u32 },
}

impl From<RequirementsClientError> for AppError {
    fn from(e: RequirementsClientError) -> Self {
        match e {
            RequirementsClientError::UnknownRole(role) => {
                AppError::NotFound(format!("role '{role}' has no requirements"))
            }
            RequirementsClientError::Malformed(message) => {
                AppError::Validation(format!("{SOURCE_NAME} sent a malformed payload: {message}"))
            }
            other => AppError::upstream(SOURCE_NAME, other),
        }
    }
}

/// Accepts a bare array or `{ "requirements": [...] }`. Records are decoded one
/// by one so the error names the offending entry.
fn decode_requirements(body: &str) -> Result<Vec<RawRequirement>, RequirementsClientError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| RequirementsClientError::Malformed(format!("body is not JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("requirements") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(RequirementsClientError::Malformed(
                    "expected a `requirements` list".to_string(),
                ))
            }
        },
        other => {
            return Err(RequirementsClientError::Malformed(format!(
                "expected a list of requirements, got {other}"
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| {
                RequirementsClientError::Malformed(format!("requirement #{}: {e}", i + 1))
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct HttpRequirementSource {
    client: Client,
    base_url: String,
}

impl HttpRequirementSource {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/requirements", self.base_url)
    }

    pub async fn fetch(
        &self,
        role: &str,
        category: Option<&str>,
        experience_level: Option<&str>,
    ) -> Result<Vec<RawRequirement>, RequirementsClientError> {
        let mut query: Vec<(&str, &str)> = vec![("role", role)];
        if let Some(category) = category {
            query.push(("category", category));
        }
        if let Some(experience) = experience_level {
            query.push(("experience_level", experience));
        }

        let mut last_error: Option<RequirementsClientError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 500ms, then 1s
                let delay = std::time::Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Requirements request attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.get(self.endpoint()).query(&query).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(RequirementsClientError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Requirements service returned {}: {}", status, body);
                last_error = Some(RequirementsClientError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if status == StatusCode::NOT_FOUND {
                return Err(RequirementsClientError::UnknownRole(role.to_string()));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(RequirementsClientError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let body = response.text().await?;
            let requirements = decode_requirements(&body)?;
            debug!("Fetched {} requirements for role '{}'", requirements.len(), role);
            return Ok(requirements);
        }

        Err(last_error.unwrap_or(RequirementsClientError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl RequirementSource for HttpRequirementSource {
    async fn get_requirements(
        &self,
        role: &str,
        category: Option<&str>,
        experience_level: Option<&str>,
    ) -> Result<Vec<RawRequirement>, AppError> {
        Ok(self.fetch(role, category, experience_level).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_accepts_bare_and_wrapped_lists() {
        let bare = decode_requirements(r#"[{"skill_name": "Rust", "demand_score": 80}]"#).unwrap();
        let wrapped = decode_requirements(
            r#"{"requirements": [{"skillName": "Rust", "marketDemand": 80, "salaryImpact": "₹4.2L"}]}"#,
        )
        .unwrap();

        assert_eq!(bare[0].name.as_deref(), Some("Rust"));
        assert_eq!(wrapped[0].market_demand, Some(80.0));
        assert!(wrapped[0].salary_impact.is_some());
    }

    #[test]
    fn test_out_of_range_numbers_decode_and_fail_validation() {
        let reqs = decode_requirements(
            r#"[{"skill_name": "Rust", "min_proficiency": -1}, {"skill_name": "Go", "demand_score": 85.5}]"#,
        )
        .unwrap();
        assert_eq!(reqs.len(), 2);

        let err = crate::analysis::normalize::normalize_requirements(reqs).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_malformed_payload_is_validation_not_upstream() {
        let err = decode_requirements(r#"[{"skill_name": "Rust"}, {"skill_name": "Go", "demand_score": "high"}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("requirement #2"));
        assert!(matches!(AppError::from(err), AppError::Validation(_)));

        for body in ["<html>oops</html>", r#"{"roles": []}"#, "42"] {
            let err: AppError = decode_requirements(body).unwrap_err().into();
            assert!(matches!(err, AppError::Validation(_)), "{body}");
        }
    }

    #[test]
    fn test_unknown_role_maps_to_not_found() {
        let err: AppError = RequirementsClientError::UnknownRole("Astronaut".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = RequirementsClientError::Exhausted { retries: 3 }.into();
        assert!(matches!(err, AppError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let source = HttpRequirementSource::new("http://localhost:9000/").unwrap();
        assert_eq!(source.endpoint(), "http://localhost:9000/requirements");
    }
}
