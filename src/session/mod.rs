//! Browser session abstraction.
//!
//! The extractor only talks to a page through [`BrowserSession`], so the
//! collection loop can run against a real Chrome ([`ChromeSession`]) or an
//! in-memory page in tests.
//!
//! ```text
//! navigate → find_all / find_one_in → read_text / read_attribute → script_click → terminate
//! ```

mod chrome;
#[cfg(test)]
pub(crate) mod fake;

pub use chrome::ChromeSession;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::Result;

/// How to locate an element.
///
/// In TOML a selector is written as a one-key table:
/// `{ class = "list-item" }`, `{ css = "div.views" }` or `{ tag = "span" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Single class name, without the leading dot
    Class(String),
    /// Any CSS selector
    Css(String),
    /// Element tag name
    Tag(String),
}

impl Selector {
    pub fn class(name: impl Into<String>) -> Self {
        Selector::Class(name.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Selector::Css(selector.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Selector::Tag(name.into())
    }

    /// Lower to a CSS selector string
    pub fn to_css(&self) -> String {
        match self {
            Selector::Class(name) => format!(".{}", name.trim_start_matches('.')),
            Selector::Css(css) => css.clone(),
            Selector::Tag(tag) => tag.clone(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Class(name) => write!(f, "class {name:?}"),
            Selector::Css(css) => write!(f, "css {css:?}"),
            Selector::Tag(tag) => write!(f, "tag {tag:?}"),
        }
    }
}

/// A live page the extractor can query and click.
///
/// Element handles are only valid for the session that produced them.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Element: Send + Sync;

    /// Load `url` in the session's page
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// All elements on the page matching `selector`, in document order
    async fn find_all(&self, selector: &Selector) -> Result<Vec<Self::Element>>;

    /// First descendant of `parent` matching `selector`, `None` when absent
    async fn find_one_in(
        &self,
        parent: &Self::Element,
        selector: &Selector,
    ) -> Result<Option<Self::Element>>;

    /// All descendants of `parent` matching `selector`, in document order
    async fn find_all_in(
        &self,
        parent: &Self::Element,
        selector: &Selector,
    ) -> Result<Vec<Self::Element>>;

    /// Rendered text of an element
    async fn read_text(&self, element: &Self::Element) -> Result<Option<String>>;

    /// Attribute value of an element
    async fn read_attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Click through a script call, skipping visibility and interactability checks
    async fn script_click(&self, element: &Self::Element) -> Result<()>;

    /// Shut the browser down. Calling it again is a no-op.
    async fn terminate(&mut self) -> Result<()>;

    /// Count of elements matching `selector`
    async fn count(&self, selector: &Selector) -> Result<usize> {
        Ok(self.find_all(selector).await?.len())
    }
}
