use std::env;
use std::path::PathBuf;
use std::time::Duration;

use fractional_site_core::store::HttpStoreConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("no content store configured: set CONTENT_FIXTURES or SANITY_PROJECT_ID")]
    NoContentStore,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    pub site_name: String,
    pub site_url: String,
    /// Scheduling link shown on the contact page.
    pub booking_url: Option<String>,
    pub sanity_project_id: Option<String>,
    pub sanity_dataset: String,
    pub sanity_api_version: String,
    pub sanity_use_cdn: bool,
    pub sanity_api_token: Option<String>,
    /// NDJSON or JSON export served instead of the hosted content lake.
    pub content_fixtures: Option<PathBuf>,
    pub revalidate_secret: Option<String>,
    pub page_cache_ttl: Duration,
}

/// Where content is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSource {
    Fixtures(PathBuf),
    ContentLake(HttpStoreConfig),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            site_name: "Ledgerline Fractional CFO".to_string(),
            site_url: "http://localhost:3000".to_string(),
            booking_url: None,
            sanity_project_id: None,
            sanity_dataset: "production".to_string(),
            sanity_api_version: "2024-01-01".to_string(),
            sanity_use_cdn: true,
            sanity_api_token: None,
            content_fixtures: None,
            revalidate_secret: None,
            page_cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", var("PORT"), "a port number")?.unwrap_or(defaults.port),
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
            site_name: var("SITE_NAME").unwrap_or(defaults.site_name),
            site_url: var("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.site_url),
            booking_url: var("BOOKING_URL"),
            sanity_project_id: var("SANITY_PROJECT_ID"),
            sanity_dataset: var("SANITY_DATASET").unwrap_or(defaults.sanity_dataset),
            sanity_api_version: var("SANITY_API_VERSION").unwrap_or(defaults.sanity_api_version),
            sanity_use_cdn: match var("SANITY_USE_CDN") {
                Some(value) => parse_bool("SANITY_USE_CDN", value)?,
                None => defaults.sanity_use_cdn,
            },
            sanity_api_token: var("SANITY_API_TOKEN"),
            content_fixtures: var("CONTENT_FIXTURES").map(PathBuf::from),
            revalidate_secret: var("SANITY_REVALIDATE_SECRET"),
            page_cache_ttl: parse_var::<u64>("PAGE_CACHE_TTL_SECS", var("PAGE_CACHE_TTL_SECS"), "a number of seconds")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.page_cache_ttl),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Fixtures win over the hosted content lake so local runs never need
    /// credentials.
    pub fn store_source(&self) -> Result<StoreSource, ConfigError> {
        if let Some(path) = &self.content_fixtures {
            return Ok(StoreSource::Fixtures(path.clone()));
        }
        let project_id = self
            .sanity_project_id
            .clone()
            .ok_or(ConfigError::NoContentStore)?;
        Ok(StoreSource::ContentLake(HttpStoreConfig {
            project_id,
            dataset: self.sanity_dataset.clone(),
            api_version: self.sanity_api_version.clone(),
            use_cdn: self.sanity_use_cdn,
            token: self.sanity_api_token.clone(),
        }))
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            value.parse().map_err(|_| ConfigError::Invalid {
                name,
                value,
                expected,
            })
        })
        .transpose()
}

fn parse_bool(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value,
            expected: "a boolean",
        }),
    }
}
