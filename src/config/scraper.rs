use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::session::Selector;

/// Configuration for the browser session and the collection loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Page load timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Upper bound on waiting for list items to render after navigation or
    /// an expansion click, in milliseconds (default: 2000)
    pub settle_timeout_ms: u64,

    /// How often the item count is re-checked while settling, in milliseconds (default: 250)
    pub poll_interval_ms: u64,

    /// Number of articles collected when none is given (default: 200)
    pub default_max_articles: usize,

    /// Give up after this many clicks in a row that render no new item.
    /// Unset means keep clicking while the control is there (default: unset)
    pub max_idle_clicks: Option<usize>,

    /// User agent string to use
    pub user_agent: Option<String>,

    /// Additional Chrome command line flags
    pub extra_args: Vec<String>,

    /// Page template selectors
    pub selectors: SelectorConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 30,
            settle_timeout_ms: 2000,
            poll_interval_ms: 250,
            default_max_articles: 200,
            max_idle_clicks: None,
            user_agent: None,
            extra_args: Vec::new(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Get the page load timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    /// Polling interval, never zero
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Where the listing keeps each piece of data.
///
/// Defaults match the RIA.ru category template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One rendered list item
    pub item: Selector,
    /// Title link inside an item, carries the text and `href`
    pub title: Selector,
    /// Views block inside an item
    pub views: Selector,
    /// Element inside the views block holding the number
    pub views_value: Selector,
    /// Tags container inside an item
    pub tags: Selector,
    /// One tag inside the container
    pub tag: Selector,
    /// The "show more" control on the page
    pub load_more: Selector,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item: Selector::class("list-item"),
            title: Selector::class("list-item__title"),
            views: Selector::css(r#"div.list-item__info-item[data-type="views"]"#),
            views_value: Selector::tag("span"),
            tags: Selector::class("list-item__tags"),
            tag: Selector::tag("a"),
            load_more: Selector::class("list-more"),
        }
    }
}
