use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    /// Base URL of the remote role requirements service. When unset the
    /// on-disk role catalog is used instead.
    pub requirements_api_url: Option<String>,
    pub role_catalog_path: String,
    /// Delay between marking a skill for removal and committing it to the deletion ledger.
    pub soft_delete_settle: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            requirements_api_url: std::env::var("REQUIREMENTS_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            role_catalog_path: std::env::var("ROLE_CATALOG_PATH")
                .unwrap_or_else(|_| "data/role_requirements.json".to_string()),
            soft_delete_settle: Duration::from_millis(
                std::env::var("SOFT_DELETE_SETTLE_MS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse::<u64>()
                    .context("SOFT_DELETE_SETTLE_MS must be a number of milliseconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
