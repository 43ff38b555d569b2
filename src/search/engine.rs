//! Paginated, rate-limited fetching of one date window

use super::query::{SearchUrl, redacted};
use super::types::{ApiResponse, PageBatch, SearchResult};
use crate::config::{Config, SearchConfig};
use crate::date::DateWindow;
use crate::error::{Error, Result, SinkError};
use crate::stats::RunContext;
use futures::Stream;
use tracing::{debug, info};

/// Status value of a successful response
const STATUS_OK: &str = "OK";

/// Number of pages to request after page 0
///
/// Page 0 holds the first `docs_per_page` hits. When `hits` is an exact
/// multiple of the page size, `hits / docs_per_page` already counts page 0,
/// so one is subtracted. Zero when everything fits on page 0.
///
/// ```
/// use nytcrawler::search::additional_pages;
///
/// assert_eq!(additional_pages(10, 10), 0);
/// assert_eq!(additional_pages(11, 10), 1);
/// assert_eq!(additional_pages(100, 10), 9);
/// assert_eq!(additional_pages(101, 10), 10);
/// ```
pub fn additional_pages(hits: u32, docs_per_page: u32) -> u32 {
    if hits <= docs_per_page {
        return 0;
    }
    let mut pages = hits / docs_per_page;
    if hits % docs_per_page == 0 {
        pages -= 1;
    }
    pages
}

/// Client for the article search endpoint
pub struct ArticleSearch {
    http: reqwest::Client,
    config: SearchConfig,
    url: SearchUrl,
}

impl ArticleSearch {
    /// Build a client from the full configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid endpoint, or a network
    /// error if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http.timeout)
            .user_agent(config.http.user_agent.as_str())
            .build()?;
        Self::with_client(http, config.search.clone())
    }

    /// Build a client around an existing `reqwest::Client`
    pub fn with_client(http: reqwest::Client, config: SearchConfig) -> Result<Self> {
        if config.docs_per_page == 0 {
            return Err(Error::config(
                "search.docs_per_page",
                "docs_per_page must be at least 1",
            ));
        }
        let url = SearchUrl::new(&config)?;
        Ok(Self { http, config, url })
    }

    /// Search settings in use
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Lazily page through every hit of `query` within `window`
    ///
    /// Nothing is requested until the first call to
    /// [`ArticlePages::next_batch`].
    pub fn pages<'a>(
        &'a self,
        ctx: &'a mut RunContext,
        api_key: &'a str,
        query: &'a str,
        window: &'a DateWindow,
    ) -> ArticlePages<'a> {
        ArticlePages {
            search: self,
            ctx,
            api_key,
            query,
            window,
            next_page: 0,
            plan: Plan::Unknown,
            finished: false,
        }
    }

    /// Fetch every hit of `query` within `window`, handing each page to `sink`
    ///
    /// Pages are delivered in ascending order, one sink call per page. The
    /// first error from the API, the transport or the sink ends the fetch;
    /// pages already handed to the sink stay delivered. A window with no hits
    /// never calls the sink.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nytcrawler::{ArticleSearch, Config, DateWindow, RunContext};
    ///
    /// # async fn example() -> nytcrawler::Result<()> {
    /// let config = Config::default();
    /// let search = ArticleSearch::new(&config)?;
    /// let mut ctx = RunContext::new(&config.rate_limit);
    /// let window = DateWindow::month(2016, 2)?;
    ///
    /// search
    ///     .fetch_articles(&mut ctx, "api-key", "election", &window, |batch| {
    ///         for result in batch {
    ///             println!("{} {}", result.pub_date, result.headline);
    ///         }
    ///         Ok::<(), std::io::Error>(())
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_articles<F, E>(
        &self,
        ctx: &mut RunContext,
        api_key: &str,
        query: &str,
        window: &DateWindow,
        mut sink: F,
    ) -> Result<()>
    where
        F: FnMut(PageBatch) -> std::result::Result<(), E>,
        E: Into<SinkError>,
    {
        let mut pages = self.pages(ctx, api_key, query, window);
        while let Some(batch) = pages.next_batch().await {
            sink(batch?).map_err(|e| Error::Sink(e.into()))?;
        }
        Ok(())
    }

    /// Issue one gated request and validate the response
    async fn fetch_page(
        &self,
        ctx: &mut RunContext,
        api_key: &str,
        query: &str,
        window: &DateWindow,
        page: u32,
    ) -> Result<ApiResponse> {
        let url = self.url.for_page(api_key, query, window, page);

        ctx.begin_request().await;
        debug!(%window, page, url = %redacted(&url), "requesting page");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        let parsed: ApiResponse = serde_json::from_slice(&body)?;

        let meta = &parsed.response.meta;
        info!(
            %window,
            page,
            status = %parsed.status,
            hits = meta.hits,
            offset = meta.offset,
            "page fetched"
        );

        if parsed.status != STATUS_OK {
            return Err(Error::ApiStatus(parsed.status));
        }
        Ok(parsed)
    }
}

/// What page 0 said about the rest of the window
#[derive(Clone, Copy, Debug)]
enum Plan {
    /// Page 0 not fetched yet
    Unknown,
    /// Fetch through this page index, inclusive
    Through(u32),
    /// Too many hits; fail before requesting page 1
    Exceeded { hits: u32, pages: u32 },
}

/// Lazy, finite, non-restartable sequence of page batches for one window
///
/// Created by [`ArticleSearch::pages`]. Each call to
/// [`next_batch`](ArticlePages::next_batch) issues at most one request. After
/// the sequence ends or yields an error it yields nothing more.
pub struct ArticlePages<'a> {
    search: &'a ArticleSearch,
    ctx: &'a mut RunContext,
    api_key: &'a str,
    query: &'a str,
    window: &'a DateWindow,
    next_page: u32,
    plan: Plan,
    finished: bool,
}

impl<'a> ArticlePages<'a> {
    /// Fetch and normalize the next page
    ///
    /// Returns `None` once every page has been yielded, immediately when the
    /// window has no hits, and after any error.
    pub async fn next_batch(&mut self) -> Option<Result<PageBatch>> {
        if self.finished {
            return None;
        }

        match self.plan {
            Plan::Exceeded { hits, pages } => {
                self.finished = true;
                return Some(Err(Error::PageLimitExceeded {
                    hits,
                    pages,
                    max_page: self.search.config.max_page,
                }));
            }
            Plan::Through(last) if self.next_page > last => {
                self.finished = true;
                return None;
            }
            _ => {}
        }

        let page = self.next_page;
        let response = match self
            .search
            .fetch_page(self.ctx, self.api_key, self.query, self.window, page)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        if page == 0 {
            let hits = response.response.meta.hits;
            if hits == 0 {
                self.finished = true;
                return None;
            }
            let pages = additional_pages(hits, self.search.config.docs_per_page);
            self.plan = if pages > self.search.config.max_page {
                Plan::Exceeded { hits, pages }
            } else {
                Plan::Through(pages)
            };
        }
        self.next_page += 1;

        let results: Vec<SearchResult> = response
            .response
            .docs
            .into_iter()
            .map(SearchResult::from)
            .collect();
        self.ctx.stats_mut().record_results(results.len());

        Some(Ok(PageBatch { page, results }))
    }

    /// Window being fetched
    pub fn window(&self) -> &DateWindow {
        self.window
    }

    /// Adapt into a [`futures::Stream`] of batches
    pub fn into_stream(self) -> impl Stream<Item = Result<PageBatch>> + 'a {
        futures::stream::unfold(self, |mut pages| async move {
            let item = pages.next_batch().await?;
            Some((item, pages))
        })
    }
}
