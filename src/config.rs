//! Configuration types for nytcrawler

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Article search endpoint and the fixed query shape sent with every request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Comma-separated response fields (`fl` parameter)
    #[serde(default = "default_fields")]
    pub fields: String,

    /// Filter queries, one `fq` parameter each (default: news articles only)
    #[serde(default = "default_filters")]
    pub filters: Vec<String>,

    /// Sort order (default: "oldest")
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Whether facet counts honor the filter queries (default: true)
    #[serde(default = "default_true")]
    pub facet_filter: bool,

    /// Documents the API returns per page (default: 10)
    #[serde(default = "default_docs_per_page")]
    pub docs_per_page: u32,

    /// Highest page index the API serves (default: 200)
    #[serde(default = "default_max_page")]
    pub max_page: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            fields: default_fields(),
            filters: default_filters(),
            sort: default_sort(),
            facet_filter: true,
            docs_per_page: default_docs_per_page(),
            max_page: default_max_page(),
        }
    }
}

/// Outbound request pacing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum spacing between the starts of two requests (default: 6 seconds)
    #[serde(default = "default_min_interval", with = "duration_serde")]
    pub min_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval: default_min_interval(),
        }
    }
}

/// HTTP client settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Longest accepted request spacing
pub const MAX_MIN_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Main configuration
///
/// Every field has a default, so an empty JSON object is a valid config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint and query shape
    #[serde(default)]
    pub search: SearchConfig,

    /// Request pacing
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load and validate a JSON config file
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be read, and a configuration
    /// error when it is not valid JSON or fails validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| {
            Error::config("config", format!("invalid config file {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the fetch engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.search.endpoint.trim().is_empty() {
            return Err(Error::config("search.endpoint", "endpoint must not be empty"));
        }
        url::Url::parse(&self.search.endpoint).map_err(|e| {
            Error::config("search.endpoint", format!("invalid endpoint URL: {e}"))
        })?;
        if self.search.docs_per_page == 0 {
            return Err(Error::config(
                "search.docs_per_page",
                "docs_per_page must be at least 1",
            ));
        }
        if self.rate_limit.min_interval > MAX_MIN_INTERVAL {
            return Err(Error::config(
                "rate_limit.min_interval",
                format!(
                    "min_interval must be at most {} seconds",
                    MAX_MIN_INTERVAL.as_secs()
                ),
            ));
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://api.nytimes.com/svc/search/v2/articlesearch.json".to_string()
}

fn default_fields() -> String {
    "headline,pub_date,web_url,uri".to_string()
}

fn default_filters() -> Vec<String> {
    vec![
        r#"type_of_material:("News")"#.to_string(),
        r#"document_type:("article")"#.to_string(),
    ]
}

fn default_sort() -> String {
    "oldest".to_string()
}

fn default_true() -> bool {
    true
}

fn default_docs_per_page() -> u32 {
    10
}

fn default_max_page() -> u32 {
    200
}

fn default_min_interval() -> Duration {
    Duration::from_secs(6)
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("nytcrawler/", env!("CARGO_PKG_VERSION")).to_string()
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
