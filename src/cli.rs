//! Command-line arguments and their validation

use crate::error::{Error, Result};
use crate::export::ExportPlan;
use chrono::Datelike;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Earliest year accepted on the command line
pub const MIN_YEAR: u32 = 1900;

/// Export every article matching a query, month by month, as CSV rows
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// API key
    #[arg(long = "apikey", env = "NYT_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Query term
    #[arg(long, default_value = "")]
    pub query: String,

    /// Years to search on, comma separated (e.g. 2015,2016)
    #[arg(long, default_value = "")]
    pub years: UintList,

    /// Months to search on, comma separated
    #[arg(long, default_value = "1,2,3,4,5,6,7,8,9,10,11,12")]
    pub months: UintList,

    /// JSON configuration file (optional)
    #[arg(long, env = "NYTCRAWLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// CSV file to write results to
    pub output: PathBuf,
}

/// Arguments after trimming and range checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// API key, trimmed
    pub api_key: String,
    /// Query term, trimmed
    pub query: String,
    /// Windows to fetch
    pub plan: ExportPlan,
    /// Output path
    pub output: PathBuf,
}

impl Args {
    /// Validate against the current calendar year
    pub fn validate(&self) -> Result<ExportRequest> {
        let current_year = u32::try_from(chrono::Utc::now().year()).unwrap_or(u32::MAX);
        self.validate_with_max_year(current_year)
    }

    /// Validate, accepting years from [`MIN_YEAR`] through `max_year`
    pub fn validate_with_max_year(&self, max_year: u32) -> Result<ExportRequest> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::config("apikey", "missing --apikey value"));
        }

        let query = self.query.trim();
        if query.is_empty() {
            return Err(Error::config("query", "missing --query value"));
        }

        if self.years.is_empty() {
            return Err(Error::config("years", "missing --years value"));
        }
        if let Some(year) = self
            .years
            .iter()
            .find(|y| !(MIN_YEAR..=max_year).contains(*y))
        {
            return Err(Error::config("years", format!("year not within range: {year}")));
        }

        if self.months.is_empty() {
            return Err(Error::config("months", "missing --months value"));
        }
        if let Some(month) = self.months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(Error::config("months", format!("month not within range: {month}")));
        }

        Ok(ExportRequest {
            api_key: api_key.to_string(),
            query: query.to_string(),
            plan: ExportPlan {
                years: self.years.to_vec(),
                months: self.months.to_vec(),
            },
            output: self.output.clone(),
        })
    }
}

/// Comma-separated list of unsigned integers
///
/// Empty or whitespace-only input parses to an empty list. Every element
/// must be a plain decimal number: no sign, no fraction, no padding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UintList(Vec<u32>);

impl UintList {
    /// Whether the list has no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the values
    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.0.iter()
    }

    /// Copy out the values
    pub fn to_vec(&self) -> Vec<u32> {
        self.0.clone()
    }
}

impl From<Vec<u32>> for UintList {
    fn from(values: Vec<u32>) -> Self {
        Self(values)
    }
}

/// Error for a malformed [`UintList`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("error parsing flag value: {0}")]
pub struct UintListError(String);

impl FromStr for UintList {
    type Err = UintListError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }

        value
            .split(',')
            .map(|s| {
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(UintListError(value.to_string()));
                }
                s.parse::<u32>()
                    .map_err(|_| UintListError(value.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for UintList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join(","))
    }
}
