use serde::{Deserialize, Serialize};

/// Metadata of one article as listed on a category page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    /// Absolute article URL, also the key in a [`Collection`](super::Collection)
    #[serde(skip)]
    pub link: String,
    /// View counter, `None` when the listing didn't show a parsable number
    pub views: Option<u64>,
    pub tags: Vec<String>,
}

impl ArticleRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            views: None,
            tags: Vec::new(),
        }
    }

    pub fn with_views(mut self, views: Option<u64>) -> Self {
        self.views = views;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn display_views(&self) -> String {
        match self.views {
            Some(v) => v.to_string(),
            None => "n/a".to_string(),
        }
    }
}
