//! Application configuration loaded from the environment.

use crate::auth::jwt::DEFAULT_TOKEN_TTL_MINUTES;
use crate::upstream::jsonplaceholder::{DEFAULT_UPSTREAM_TIMEOUT_SECS, JSONPLACEHOLDER_API_BASE};
use anyhow::{bail, Context, Result};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Process-wide token signing key. Required; there is no insecure default.
    pub secret_key: String,
    pub port: u16,
    pub token_ttl_minutes: i64,
    pub audit_log_path: String,
    pub audit_log_raw_tokens: bool,
    pub upstream_base_url: String,
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let secret_key = match std::env::var("SECRET_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => bail!(
                "SECRET_KEY environment variable not set. \
                 Set it in your .env file or as a system environment variable."
            ),
        };

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);

        let token_ttl_minutes = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);

        let audit_log_path =
            std::env::var("AUDIT_LOG_PATH").unwrap_or_else(|_| "api_usage.log".to_string());

        let audit_log_raw_tokens = std::env::var("AUDIT_LOG_RAW_TOKENS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(true);

        let upstream_base_url = std::env::var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|_| JSONPLACEHOLDER_API_BASE.to_string());

        let upstream_timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Ok(Self {
            secret_key,
            port,
            token_ttl_minutes,
            audit_log_path,
            audit_log_raw_tokens,
            upstream_base_url,
            upstream_timeout_secs,
        })
    }
}

/// Open the append-only audit log sink. Failure to open it is a startup
/// error; the service never runs without its audit trail.
pub fn open_audit_log(path: &str) -> Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open audit log {}", path))
}
