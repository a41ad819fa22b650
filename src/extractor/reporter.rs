use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::{ExtractionError, ScraperError};
use crate::domain::{ArticleRecord, RunState};

/// Optional fields of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Views,
    Tags,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Views => f.write_str("views"),
            Field::Tags => f.write_str("tags"),
        }
    }
}

/// Why the listing could not be expanded any further
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationEnd {
    /// No "show more" control on the page
    ControlMissing,
    /// The control could not be queried or clicked
    ControlUnavailable(String),
    /// `max_idle_clicks` clicks in a row rendered nothing new
    NoNewItems { rendered: usize },
}

impl fmt::Display for PaginationEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationEnd::ControlMissing => f.write_str("\"show more\" control not found"),
            PaginationEnd::ControlUnavailable(reason) => {
                write!(f, "\"show more\" control unusable: {}", reason)
            }
            PaginationEnd::NoNewItems { rendered } => {
                write!(f, "no new items after repeated clicks ({} rendered)", rendered)
            }
        }
    }
}

/// Observer of a collection run.
///
/// Every callback has an empty default so implementors pick what they need.
pub trait Reporter: Send + Sync {
    fn navigated(&self, _url: &str, _rendered: usize) {}

    fn article_collected(&self, _state: &RunState, _record: &ArticleRecord, _replaced: bool) {}

    fn field_missing(&self, _link: &str, _field: Field, _reason: &ExtractionError) {}

    fn item_skipped(&self, _index: usize, _reason: &ExtractionError) {}

    fn expanded(&self, _before: usize, _after: usize) {}

    fn pagination_exhausted(&self, _state: &RunState, _end: &PaginationEnd) {}

    /// The rendered list got shorter than what was already visited
    fn list_reordered(&self, _rendered: usize, _processed: usize) {}

    fn terminate_failed(&self, _err: &ScraperError) {}

    fn finished(&self, _collected: usize, _target: usize) {}
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn navigated(&self, url: &str, rendered: usize) {
        (**self).navigated(url, rendered)
    }

    fn article_collected(&self, state: &RunState, record: &ArticleRecord, replaced: bool) {
        (**self).article_collected(state, record, replaced)
    }

    fn field_missing(&self, link: &str, field: Field, reason: &ExtractionError) {
        (**self).field_missing(link, field, reason)
    }

    fn item_skipped(&self, index: usize, reason: &ExtractionError) {
        (**self).item_skipped(index, reason)
    }

    fn expanded(&self, before: usize, after: usize) {
        (**self).expanded(before, after)
    }

    fn pagination_exhausted(&self, state: &RunState, end: &PaginationEnd) {
        (**self).pagination_exhausted(state, end)
    }

    fn list_reordered(&self, rendered: usize, processed: usize) {
        (**self).list_reordered(rendered, processed)
    }

    fn terminate_failed(&self, err: &ScraperError) {
        (**self).terminate_failed(err)
    }

    fn finished(&self, collected: usize, target: usize) {
        (**self).finished(collected, target)
    }
}

/// Reports progress as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn navigated(&self, url: &str, rendered: usize) {
        info!(%url, rendered, "Parsing category");
    }

    fn article_collected(&self, state: &RunState, record: &ArticleRecord, replaced: bool) {
        if replaced {
            debug!(link = %record.link, "Article listed again, record replaced");
        }
        info!(
            "[{}/{}] {} ({} views)",
            state.collected_count,
            state.target_count,
            record.title,
            record.display_views()
        );
    }

    fn field_missing(&self, link: &str, field: Field, reason: &ExtractionError) {
        warn!(%link, %field, "Failed to get {}: {}", field, reason);
    }

    fn item_skipped(&self, index: usize, reason: &ExtractionError) {
        warn!(index, "Failed to process article: {}", reason);
    }

    fn expanded(&self, before: usize, after: usize) {
        info!(before, after, "Clicked \"show more\"");
    }

    fn pagination_exhausted(&self, state: &RunState, end: &PaginationEnd) {
        warn!(
            collected = state.collected_count,
            target = state.target_count,
            "Failed to click \"show more\": {}",
            end
        );
    }

    fn list_reordered(&self, rendered: usize, processed: usize) {
        warn!(
            rendered,
            processed, "Listing shrank below the visited offset, rescanning from the top"
        );
    }

    fn terminate_failed(&self, err: &ScraperError) {
        warn!("Failed to shut the browser down: {}", err);
    }

    fn finished(&self, collected: usize, target: usize) {
        info!(collected, target, "Done. Articles collected: {}", collected);
    }
}
