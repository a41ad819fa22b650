//! Category page extraction.
//!
//! Loads a category listing and keeps expanding it until enough articles
//! are collected or the listing runs out.
//!
//! ```text
//! navigate → settle → [scan new items → expand → settle]* → terminate
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use category_scraper::config::ScraperConfig;
//! use category_scraper::extractor::CategoryExtractor;
//! use category_scraper::session::ChromeSession;
//!
//! let config = ScraperConfig::default();
//! let session = ChromeSession::launch(config.clone()).await?;
//! let articles = CategoryExtractor::new(session, config)
//!     .collect("https://ria.ru/politics/", 50)
//!     .await?;
//! ```
//!
//! Every successful insert counts toward the target, a re-listed link
//! included, so the result never holds more records than requested.
//!
//! Only the items rendered after the last visited one are scanned on each
//! pass. The listing is expected to grow by appending; if it ever gets shorter
//! than the visited offset the scan restarts from the top and the link-keyed
//! [`Collection`] absorbs the repeats.

mod reporter;

pub use reporter::{Field, PaginationEnd, Reporter, TracingReporter};

use tokio::time::Instant;
use url::Url;

use crate::app::{ExtractionError, Result, ScraperError};
use crate::config::ScraperConfig;
use crate::domain::{ArticleRecord, Collection, RunState};
use crate::session::{BrowserSession, ChromeSession};

/// Result of extracting one optional field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome<T> {
    Present(T),
    Absent(ExtractionError),
}

impl<T> From<std::result::Result<T, ExtractionError>> for FieldOutcome<T> {
    fn from(result: std::result::Result<T, ExtractionError>) -> Self {
        match result {
            Ok(value) => FieldOutcome::Present(value),
            Err(reason) => FieldOutcome::Absent(reason),
        }
    }
}

/// Result of extracting one list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Extracted(ArticleRecord),
    Skipped(ExtractionError),
}

/// Collects article metadata from one category listing.
///
/// Owns the browser session for the duration of a run and terminates it when
/// the run ends, whatever the outcome.
pub struct CategoryExtractor<S: BrowserSession, R: Reporter = TracingReporter> {
    session: S,
    config: ScraperConfig,
    reporter: R,
}

impl<S: BrowserSession> CategoryExtractor<S, TracingReporter> {
    pub fn new(session: S, config: ScraperConfig) -> Self {
        Self::with_reporter(session, config, TracingReporter)
    }
}

impl<S: BrowserSession, R: Reporter> CategoryExtractor<S, R> {
    pub fn with_reporter(session: S, config: ScraperConfig, reporter: R) -> Self {
        Self {
            session,
            config,
            reporter,
        }
    }

    /// Collect with the configured default target
    pub async fn collect_default(self, category_url: &str) -> Result<Collection> {
        let max_articles = self.config.default_max_articles;
        self.collect(category_url, max_articles).await
    }

    /// Collect up to `max_articles` articles from `category_url`.
    ///
    /// Returns fewer when the "show more" control is gone or can't be
    /// clicked, or when the idle click limit (off by default) is hit. Only
    /// navigation and session failures are returned as errors. The session
    /// is terminated before this returns.
    pub async fn collect(mut self, category_url: &str, max_articles: usize) -> Result<Collection> {
        let outcome = self.run(category_url, max_articles).await;

        if let Err(e) = self.session.terminate().await {
            self.reporter.terminate_failed(&e);
        }

        let collection = outcome?;
        self.reporter.finished(collection.len(), max_articles);
        Ok(collection)
    }

    async fn run(&mut self, category_url: &str, max_articles: usize) -> Result<Collection> {
        if category_url.trim().is_empty() {
            return Err(ScraperError::InvalidInput("category URL is empty".into()));
        }
        if max_articles == 0 {
            return Err(ScraperError::InvalidInput(
                "max_articles must be positive".into(),
            ));
        }
        let base = Url::parse(category_url.trim())?;

        self.session.navigate(base.as_str()).await?;
        let rendered = self.wait_for_items(0).await?;
        self.reporter.navigated(base.as_str(), rendered);

        let mut collection = Collection::new();
        let mut state = RunState::new(max_articles);
        let mut idle_clicks = 0;

        while !state.is_complete() {
            let items = self.session.find_all(&self.config.selectors.item).await?;

            if items.len() < state.processed_offset {
                self.reporter
                    .list_reordered(items.len(), state.processed_offset);
                state.processed_offset = 0;
            }

            for item in &items[state.processed_offset..] {
                let index = state.processed_offset;
                state.processed_offset += 1;

                match self.extract_item(item, &base).await {
                    ItemOutcome::Extracted(record) => {
                        let link = record.link.clone();
                        let replaced = collection.insert(record).is_some();
                        state.collected_count += 1;
                        if let Some(record) = collection.get(&link) {
                            self.reporter.article_collected(&state, record, replaced);
                        }
                        if state.is_complete() {
                            break;
                        }
                    }
                    ItemOutcome::Skipped(reason) => self.reporter.item_skipped(index, &reason),
                }
            }

            if state.is_complete() {
                break;
            }

            if let Err(end) = self.click_load_more().await {
                self.reporter.pagination_exhausted(&state, &end);
                break;
            }

            let after = self.wait_for_items(items.len()).await?;
            self.reporter.expanded(items.len(), after);

            if after == items.len() {
                idle_clicks += 1;
                if self.config.max_idle_clicks.is_some_and(|limit| idle_clicks >= limit) {
                    let end = PaginationEnd::NoNewItems { rendered: after };
                    self.reporter.pagination_exhausted(&state, &end);
                    break;
                }
            } else {
                idle_clicks = 0;
            }
        }

        Ok(collection)
    }

    /// Build a record from one list item. Never fails the run.
    pub async fn extract_item(&self, item: &S::Element, base: &Url) -> ItemOutcome {
        match self.extract_record(item, base).await {
            Ok(record) => ItemOutcome::Extracted(record),
            Err(reason) => ItemOutcome::Skipped(reason),
        }
    }

    async fn extract_record(
        &self,
        item: &S::Element,
        base: &Url,
    ) -> std::result::Result<ArticleRecord, ExtractionError> {
        let selectors = &self.config.selectors;

        let title_el = self
            .session
            .find_one_in(item, &selectors.title)
            .await?
            .ok_or_else(|| ExtractionError::MissingElement(selectors.title.to_string()))?;

        let title = self
            .session
            .read_text(&title_el)
            .await?
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let href = self
            .session
            .read_attribute(&title_el, "href")
            .await?
            .ok_or_else(|| ExtractionError::MissingAttribute("href".into()))?;
        let link = resolve_link(base, &href)?;

        let views = match self.extract_views(item).await {
            FieldOutcome::Present(views) => Some(views),
            FieldOutcome::Absent(reason) => {
                self.reporter.field_missing(&link, Field::Views, &reason);
                None
            }
        };

        let tags = match self.extract_tags(item).await {
            FieldOutcome::Present(tags) => tags,
            FieldOutcome::Absent(reason) => {
                self.reporter.field_missing(&link, Field::Tags, &reason);
                Vec::new()
            }
        };

        Ok(ArticleRecord::new(title, link)
            .with_views(views)
            .with_tags(tags))
    }

    pub async fn extract_views(&self, item: &S::Element) -> FieldOutcome<u64> {
        self.read_views(item).await.into()
    }

    pub async fn extract_tags(&self, item: &S::Element) -> FieldOutcome<Vec<String>> {
        self.read_tags(item).await.into()
    }

    async fn read_views(&self, item: &S::Element) -> std::result::Result<u64, ExtractionError> {
        let selectors = &self.config.selectors;

        let block = self
            .session
            .find_one_in(item, &selectors.views)
            .await?
            .ok_or_else(|| ExtractionError::MissingElement(selectors.views.to_string()))?;
        let value = self
            .session
            .find_one_in(&block, &selectors.views_value)
            .await?
            .ok_or_else(|| ExtractionError::MissingElement(selectors.views_value.to_string()))?;
        let text = self
            .session
            .read_text(&value)
            .await?
            .ok_or(ExtractionError::EmptyText)?;

        parse_views(&text)
    }

    async fn read_tags(
        &self,
        item: &S::Element,
    ) -> std::result::Result<Vec<String>, ExtractionError> {
        let selectors = &self.config.selectors;

        let container = self
            .session
            .find_one_in(item, &selectors.tags)
            .await?
            .ok_or_else(|| ExtractionError::MissingElement(selectors.tags.to_string()))?;

        let mut tags = Vec::new();
        for tag in self.session.find_all_in(&container, &selectors.tag).await? {
            if let Some(text) = self.session.read_text(&tag).await? {
                let text = text.trim();
                if !text.is_empty() {
                    tags.push(text.to_string());
                }
            }
        }
        Ok(tags)
    }

    /// Find and script-click the "show more" control
    async fn click_load_more(&self) -> std::result::Result<(), PaginationEnd> {
        let selectors = &self.config.selectors;

        let control = self
            .session
            .find_all(&selectors.load_more)
            .await
            .map_err(|e| PaginationEnd::ControlUnavailable(e.to_string()))?
            .into_iter()
            .next()
            .ok_or(PaginationEnd::ControlMissing)?;

        self.session
            .script_click(&control)
            .await
            .map_err(|e| PaginationEnd::ControlUnavailable(e.to_string()))
    }

    /// Poll the item count until it differs from `baseline` or the settle
    /// timeout elapses. Returns the last count seen.
    async fn wait_for_items(&self, baseline: usize) -> Result<usize> {
        let deadline = Instant::now() + self.config.settle_timeout();
        let poll = self.config.poll_interval();

        loop {
            let count = self.session.count(&self.config.selectors.item).await?;
            let now = Instant::now();
            if count != baseline || now >= deadline {
                return Ok(count);
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }
}

/// Launch Chrome and collect from `category_url`.
///
/// `max_articles` falls back to the configured default.
pub async fn collect_category(
    category_url: &str,
    max_articles: Option<usize>,
    config: ScraperConfig,
) -> Result<Collection> {
    let max_articles = max_articles.unwrap_or(config.default_max_articles);
    let session = ChromeSession::launch(config.clone()).await?;
    CategoryExtractor::new(session, config)
        .collect(category_url, max_articles)
        .await
}

/// Parse a view counter such as `"12 345"`, ignoring any whitespace
pub fn parse_views(text: &str) -> std::result::Result<u64, ExtractionError> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Err(ExtractionError::EmptyText);
    }
    digits
        .parse()
        .map_err(|_| ExtractionError::Unparsable {
            value: text.trim().to_string(),
        })
}

/// Resolve an `href` against the category page URL
pub fn resolve_link(base: &Url, href: &str) -> std::result::Result<String, ExtractionError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(ExtractionError::MissingAttribute("href".into()));
    }
    base.join(href)
        .map(String::from)
        .map_err(|e| ExtractionError::InvalidLink {
            link: href.to_string(),
            reason: e.to_string(),
        })
}
