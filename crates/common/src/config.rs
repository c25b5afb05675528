//! Application configuration

use std::env;

use crate::{Error, Result};

/// Default trailing window for the activity graph, in days
pub const DEFAULT_ACTIVITY_WINDOW_DAYS: u32 = 30;

/// Largest activity window a caller may request
pub const MAX_ACTIVITY_WINDOW_DAYS: u32 = 365;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub host: String,
    pub port: u16,
    /// Days shown in the activity graph when the request doesn't override it
    pub activity_window_days: u32,
    /// `max-age` for the Cache-Control header on successful responses
    pub cache_max_age_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            github_token: lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()),
            github_api_url: lookup("GITHUB_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.github.com".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            activity_window_days: lookup("ACTIVITY_WINDOW_DAYS")
                .and_then(|d| d.parse::<u32>().ok())
                .unwrap_or(DEFAULT_ACTIVITY_WINDOW_DAYS)
                .clamp(1, MAX_ACTIVITY_WINDOW_DAYS),
            cache_max_age_secs: lookup("CACHE_MAX_AGE_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1800),
        }
    }

    /// The GitHub token, required for GraphQL access
    pub fn require_github_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .ok_or_else(|| Error::Config("GitHub token required for API access".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.github_token, None);
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.activity_window_days, 30);
        assert_eq!(config.cache_max_age_secs, 1800);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GITHUB_TOKEN", "ghp_test"),
            ("GITHUB_API_URL", "http://localhost:8080/"),
            ("PORT", "8000"),
            ("ACTIVITY_WINDOW_DAYS", "14"),
            ("CACHE_MAX_AGE_SECS", "60"),
        ]);
        assert_eq!(config.github_token.as_deref(), Some("ghp_test"));
        assert_eq!(config.github_api_url, "http://localhost:8080");
        assert_eq!(config.port, 8000);
        assert_eq!(config.activity_window_days, 14);
        assert_eq!(config.cache_max_age_secs, 60);
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(config_from(&[("ACTIVITY_WINDOW_DAYS", "0")]).activity_window_days, 1);
        assert_eq!(
            config_from(&[("ACTIVITY_WINDOW_DAYS", "9999")]).activity_window_days,
            365
        );
    }

    #[test]
    fn test_invalid_port_falls_back() {
        assert_eq!(config_from(&[("PORT", "not-a-port")]).port, 3000);
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let config = config_from(&[("GITHUB_TOKEN", "  ")]);
        assert!(matches!(
            config.require_github_token(),
            Err(Error::Config(_))
        ));
    }
}
