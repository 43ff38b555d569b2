//! # nytcrawler
//!
//! Bulk exporter for the New York Times article search API.
//!
//! Given a query term and a set of months, nytcrawler retrieves every
//! matching article one monthly window at a time and hands normalized rows to
//! a consumer, typically a CSV file.
//!
//! ## Design
//!
//! - **Sequential** - pages and windows are fetched strictly in order
//! - **Rate limited** - every request, across the whole run, goes through one
//!   [`RequestGate`](rate_limit::RequestGate)
//! - **Streaming** - each page is delivered as soon as it arrives, so a
//!   multi-year export never holds more than one page in memory
//! - **Fail fast** - the first error ends the run; nothing is retried
//!
//! ## Quick Start
//!
//! ```no_run
//! use nytcrawler::{ArticleSearch, Config, DateWindow, RunContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let search = ArticleSearch::new(&config)?;
//!     let mut ctx = RunContext::new(&config.rate_limit);
//!
//!     let window = DateWindow::month(2016, 2)?;
//!     let mut pages = search.pages(&mut ctx, "your-api-key", "election", &window);
//!     while let Some(batch) = pages.next_batch().await {
//!         for article in batch? {
//!             println!("{} {}", article.pub_date, article.headline);
//!         }
//!     }
//!
//!     ctx.stats().log_summary();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Command-line arguments
pub mod cli;
/// Configuration types
pub mod config;
/// Monthly date windows
pub mod date;
/// Error types
pub mod error;
/// Multi-window export and CSV output
pub mod export;
/// Request pacing
pub mod rate_limit;
/// Paginated article search
pub mod search;
/// Run counters and context
pub mod stats;

// Re-export commonly used types
pub use config::Config;
pub use date::DateWindow;
pub use error::{Error, Result, SinkError};
pub use export::{CsvSink, ExportPlan};
pub use search::{ArticlePages, ArticleSearch, PageBatch, SearchResult};
pub use stats::{RunContext, RunStats};
