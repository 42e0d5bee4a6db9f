//! Centralized configuration management for bluetick-console

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::i18n::Catalog;
use crate::models::ROWS_PER_PAGE_OPTIONS;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend connection settings
    pub api: ApiConfig,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Company table defaults
    pub listing: ListingConfig,
    /// JSON file overriding the built-in wording (optional)
    pub locale_file: Option<PathBuf>,
    /// Log file used while the TUI owns the terminal
    pub log_file: PathBuf,
}

/// Backend connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Bearer token sent with every request (optional)
    pub token: Option<String>,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub default_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000/graphql".to_string(),
            token: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "bluetick-console/0.1.0".to_string(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: ROWS_PER_PAGE_OPTIONS[0],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            http: HttpConfig::default(),
            listing: ListingConfig::default(),
            locale_file: None,
            log_file: "bluetick_console.log".into(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let api = ApiConfig {
            endpoint: std::env::var("BLUETICK_API_URL").unwrap_or(defaults.api.endpoint),
            token: std::env::var("BLUETICK_API_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("BLUETICK_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: std::env::var("BLUETICK_USER_AGENT").unwrap_or(defaults.http.user_agent),
        };

        let listing = ListingConfig {
            default_page_size: parse_env_var("BLUETICK_PAGE_SIZE")?
                .unwrap_or(defaults.listing.default_page_size),
        };

        let locale_file = std::env::var("BLUETICK_LOCALE_FILE").ok().map(PathBuf::from);

        let log_file = std::env::var("BLUETICK_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        Ok(Config {
            api,
            http,
            listing,
            locale_file,
            log_file,
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Built-in wording merged with the configured locale file
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.locale_file {
            Some(path) => Catalog::from_json_file(path),
            None => Ok(Catalog::english()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api.endpoint.starts_with("http://") || self.api.endpoint.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API endpoint must be an http(s) URL: {}",
                self.api.endpoint
            ));
        }

        if !ROWS_PER_PAGE_OPTIONS.contains(&self.listing.default_page_size) {
            return Err(anyhow::anyhow!(
                "Page size {} is not one of {:?}",
                self.listing.default_page_size,
                ROWS_PER_PAGE_OPTIONS
            ));
        }

        if let Some(path) = &self.locale_file {
            std::fs::metadata(path)
                .with_context(|| format!("Cannot access locale file: {}", path.display()))?;
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, "http://localhost:4000/graphql");
        assert_eq!(config.listing.default_page_size, 50);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        config.validate().unwrap();
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.api.endpoint = "localhost:4000".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.listing.default_page_size = 55;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.locale_file = Some("/definitely/not/here.json".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_catalog_from_locale_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.json");
        std::fs::write(&path, r#"{ "confirm": "Bestätigen" }"#).unwrap();

        let config = Config {
            locale_file: Some(path),
            ..Config::default()
        };
        config.validate().unwrap();

        use crate::i18n::Translate;
        assert_eq!(config.catalog().unwrap().text("confirm"), "Bestätigen");
    }
}
