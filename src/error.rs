//! Error types for nytcrawler
//!
//! Every error is fatal to the window being fetched. Nothing here is retried:
//! the export driver stops the whole run at the first failing window.

use crate::date::DateWindow;
use thiserror::Error;

/// Result type alias for nytcrawler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Opaque error returned by a caller-supplied batch sink
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for nytcrawler
#[derive(Debug, Error)]
pub enum Error {
    /// The search endpoint answered with a non-success HTTP status
    #[error("status {status}: {reason}")]
    Transport {
        /// Numeric HTTP status code
        status: u16,
        /// Canonical reason phrase for the status, if known
        reason: String,
    },

    /// Connection, timeout or body read failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body is not the expected JSON shape
    #[error("error reading JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response `status` field was not the success marker
    #[error("API status: {0}")]
    ApiStatus(String),

    /// Fetching every hit would need more pages than the API serves
    #[error("hits will exceed max pages to fetch: {hits} hits need {pages} more pages, max is {max_page}")]
    PageLimitExceeded {
        /// Total hit count reported on page 0
        hits: u32,
        /// Additional pages that would have been requested
        pages: u32,
        /// Highest page index the API accepts
        max_page: u32,
    },

    /// The batch consumer rejected a page
    #[error("sink error: {0}")]
    Sink(#[source] SinkError),

    /// A window of a multi-window export failed
    #[error("{window}: fetch error: {source}")]
    Window {
        /// The window that was being fetched
        window: DateWindow,
        /// What went wrong while fetching it
        #[source]
        source: Box<Error>,
    },

    /// Month number outside 1..=12
    #[error("invalid month {0}")]
    InvalidMonth(u32),

    /// Configuration or argument error
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message
        message: String,
        /// The setting that caused the error (e.g., "search.docs_per_page")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Build a configuration error tied to a specific setting
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// The innermost error, looking through [`Error::Window`] wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Window { source, .. } => source.root(),
            other => other,
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display_includes_status_and_reason() {
        let err = Error::Transport {
            status: 429,
            reason: "Too Many Requests".to_string(),
        };
        assert_eq!(err.to_string(), "status 429: Too Many Requests");
    }

    #[test]
    fn window_error_names_window_and_cause() {
        let window = DateWindow::month(2016, 2).unwrap();
        let err = Error::Window {
            window,
            source: Box::new(Error::ApiStatus("ERROR".to_string())),
        };

        assert_eq!(
            err.to_string(),
            "20160201-20160229: fetch error: API status: ERROR"
        );
        assert!(matches!(err.root(), Error::ApiStatus(s) if s == "ERROR"));
    }

    #[test]
    fn sink_error_exposes_source() {
        let inner: SinkError = "disk full".into();
        let err = Error::Sink(inner);

        let source = std::error::Error::source(&err).expect("sink error should carry a source");
        assert_eq!(source.to_string(), "disk full");
    }
}
