//! # category-scraper
//!
//! Collects article metadata (title, link, views, tags) from a news category
//! listing by driving Chrome and pressing "show more" until enough articles
//! are loaded.
//!
//! ```text
//! ChromeSession → CategoryExtractor → Collection → JSON
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! category-scraper https://ria.ru/politics/ -n 50 > politics.json
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`domain`]: Article records and the link-keyed collection
//! - [`extractor`]: The pagination and extraction loop
//! - [`session`]: Browser session trait and the Chrome implementation

/// Error handling.
///
/// [`ScraperError`](app::ScraperError) covers run-level failures,
/// [`ExtractionError`](app::ExtractionError) per-field and per-item ones.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/category-scraper/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`ArticleRecord`](domain::ArticleRecord): One listed article
/// - [`Collection`](domain::Collection): Records keyed by link
pub mod domain;

/// Category listing extraction.
///
/// - [`CategoryExtractor`](extractor::CategoryExtractor): The collection loop
/// - [`Reporter`](extractor::Reporter): Progress observer, defaults to `tracing`
pub mod extractor;

/// Browser access.
///
/// - [`BrowserSession`](session::BrowserSession): What the extractor needs from a browser
/// - [`ChromeSession`](session::ChromeSession): chromiumoxide implementation
pub mod session;
