//! Article search: paginated fetching and result normalization
//!
//! [`ArticleSearch`] turns one query over one [`DateWindow`](crate::date::DateWindow)
//! into a bounded, strictly ordered sequence of rate-limited page requests:
//!
//! 1. Page 0 is requested and its hit count read
//! 2. The number of further pages is computed with [`additional_pages`]
//! 3. If that exceeds the configured `max_page`, the fetch fails before any
//!    further request
//! 4. Pages 1..=N are requested in order, each through the run's request gate
//!
//! Each page is normalized into a [`PageBatch`] and handed to the caller, either
//! through a sink callback ([`ArticleSearch::fetch_articles`]) or by pulling
//! from an [`ArticlePages`] cursor.

mod engine;
mod query;
mod types;

pub use engine::{ArticlePages, ArticleSearch, additional_pages};
pub use types::{PageBatch, SearchResult, normalize_headline};
