use thiserror::Error;

use crate::config::ConfigError;

/// Run-scoped failures. These are the only errors a caller of
/// [`CategoryExtractor::collect`](crate::extractor::CategoryExtractor::collect) ever sees.
#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScraperError>;

/// Why a single field or a single list item could not be extracted.
///
/// Never leaves the collection loop: it only travels inside
/// [`FieldOutcome`](crate::extractor::FieldOutcome) and
/// [`ItemOutcome`](crate::extractor::ItemOutcome) to the reporter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no element matches {0}")]
    MissingElement(String),

    #[error("element has no `{0}` attribute")]
    MissingAttribute(String),

    #[error("element text is empty")]
    EmptyText,

    #[error("cannot parse {value:?} as a number")]
    Unparsable { value: String },

    #[error("invalid link {link:?}: {reason}")]
    InvalidLink { link: String, reason: String },

    #[error("{0}")]
    Session(String),
}

impl From<ScraperError> for ExtractionError {
    fn from(err: ScraperError) -> Self {
        ExtractionError::Session(err.to_string())
    }
}
