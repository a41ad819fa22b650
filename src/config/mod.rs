//! Configuration management.
//!
//! Configuration is read from `~/.config/category-scraper/config.toml` unless
//! another path is given. If the default file doesn't exist, it is created
//! with comments.

mod scraper;

pub use scraper::{ScraperConfig, SelectorConfig};

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// and a commented default file is created there when missing.
    /// Missing fields in the config file will use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::default_config_path()?;
                if !config_path.exists() {
                    Self::create_default_config(&config_path)?;
                    return Ok(Self::default());
                }
                Self::load_from(&config_path)
            }
        }
    }

    /// Load configuration from a file that must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/category-scraper/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("category-scraper").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# category-scraper configuration
#
# Selectors are one-key tables:
# - { class = "name" }  a single class name
# - { css = "div.a > span" }  any CSS selector
# - { tag = "span" }  an element tag name

[scraper]
# Run browser in headless mode (no visible window)
headless = true

# Page load timeout in seconds
timeout_secs = 30

# Longest wait for list items to render after loading the page or
# clicking "show more" (milliseconds)
settle_timeout_ms = 2000

# How often the listing is re-checked while waiting (milliseconds)
poll_interval_ms = 250

# Articles to collect when --max-articles is not given
default_max_articles = 200

# Stop after this many "show more" clicks in a row that load nothing.
# Unset: keep clicking for as long as the control is on the page.
# max_idle_clicks = 5

# Extra Chrome flags
extra_args = []

# user_agent = "Mozilla/5.0 ..."

[scraper.selectors]
item = { class = "list-item" }
title = { class = "list-item__title" }
views = { css = 'div.list-item__info-item[data-type="views"]' }
views_value = { tag = "span" }
tags = { class = "list-item__tags" }
tag = { tag = "a" }
load_more = { class = "list-more" }
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
