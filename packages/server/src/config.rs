use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

pub const DEFAULT_ANALYSIS_MODEL: &str = "google/gemini-3-pro-preview";
pub const DEFAULT_METADATA_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MIN_REPORT_TEXT_LENGTH: usize = 100;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub analysis_model: String,
    pub metadata_model: String,
    pub analysis_timeout: Duration,
    pub min_report_text_length: usize,
    pub max_upload_bytes: usize,
    /// Enables the durable report catalog when set
    pub database_url: Option<String>,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openrouter_api_key: get("OPENROUTER_API_KEY")
                .context("OPENROUTER_API_KEY must be set")?,
            openrouter_base_url: get("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| openrouter_client::DEFAULT_BASE_URL.to_string()),
            analysis_model: get("ANALYSIS_MODEL")
                .unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.to_string()),
            metadata_model: get("METADATA_MODEL")
                .unwrap_or_else(|| DEFAULT_METADATA_MODEL.to_string()),
            analysis_timeout: Duration::from_secs(
                get("ANALYSIS_TIMEOUT_SECS")
                    .unwrap_or_else(|| DEFAULT_ANALYSIS_TIMEOUT_SECS.to_string())
                    .parse()
                    .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            min_report_text_length: get("MIN_REPORT_TEXT_LENGTH")
                .unwrap_or_else(|| DEFAULT_MIN_REPORT_TEXT_LENGTH.to_string())
                .parse()
                .context("MIN_REPORT_TEXT_LENGTH must be a valid number")?,
            max_upload_bytes: get("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|| DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse()
                .context("MAX_UPLOAD_BYTES must be a valid number")?,
            database_url: get("DATABASE_URL"),
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "sk-or-1")])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.openrouter_base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.analysis_model, "google/gemini-3-pro-preview");
        assert_eq!(config.analysis_timeout, Duration::from_secs(300));
        assert_eq!(config.min_report_text_length, 100);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert!(config.database_url.is_none());
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("OPENROUTER_API_KEY", "sk-or-1"),
            ("PORT", "3000"),
            ("ANALYSIS_TIMEOUT_SECS", "45"),
            ("DATABASE_URL", "postgres://localhost/reports"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, https://desk.example.com,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.analysis_timeout, Duration::from_secs(45));
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/reports")
        );
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://desk.example.com"]
        );
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        assert!(Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_invalid_numbers_fail() {
        assert!(Config::from_lookup(lookup(&[
            ("OPENROUTER_API_KEY", "sk-or-1"),
            ("PORT", "eighty"),
        ]))
        .is_err());

        assert!(Config::from_lookup(lookup(&[
            ("OPENROUTER_API_KEY", "sk-or-1"),
            ("ANALYSIS_TIMEOUT_SECS", "5m"),
        ]))
        .is_err());
    }
}
