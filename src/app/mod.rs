pub mod error;

pub use error::{ExtractionError, Result, ScraperError};
