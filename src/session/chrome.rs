use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{Result, ScraperError};
use crate::config::ScraperConfig;
use crate::session::{BrowserSession, Selector};

const CLICK_FN: &str = "function() { this.click(); }";

/// Single-page Chrome session driven over CDP by chromiumoxide
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    config: ScraperConfig,
    closed: bool,
}

impl ChromeSession {
    /// Launch a browser and open one blank page
    pub async fn launch(config: ScraperConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-infobars")
            .arg("--disable-extensions");

        for arg in &config.extra_args {
            builder = builder.arg(arg.as_str());
        }

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::Browser(format!("Failed to build browser config: {}", e)))?;

        info!(headless = config.headless, "Launching Chrome");
        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ScraperError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(ScraperError::Browser(format!("Failed to create page: {}", e)));
            }
        };

        if let Some(ref ua) = config.user_agent {
            if let Err(e) = page.set_user_agent(ua).await {
                handler.abort();
                return Err(ScraperError::Browser(format!("Failed to set user agent: {}", e)));
            }
        }

        Ok(Self {
            browser,
            page,
            handler,
            config,
            closed: false,
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ScraperError::Session("browser session already terminated".into()));
        }
        Ok(())
    }
}

fn session_err(action: &str, selector: &Selector, e: impl std::fmt::Display) -> ScraperError {
    ScraperError::Session(format!("{} {}: {}", action, selector, e))
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.ensure_open()?;

        let navigation_err = |reason: String| ScraperError::Navigation {
            url: url.to_string(),
            reason,
        };

        let load = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| navigation_err(e.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| navigation_err(e.to_string()))?;
            Ok::<(), ScraperError>(())
        };

        match tokio::time::timeout(self.config.timeout(), load).await {
            Ok(result) => result,
            Err(_) => Err(navigation_err(format!(
                "timed out after {}s",
                self.config.timeout_secs
            ))),
        }
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<Element>> {
        self.ensure_open()?;
        self.page
            .find_elements(selector.to_css())
            .await
            .map_err(|e| session_err("query", selector, e))
    }

    async fn find_one_in(&self, parent: &Element, selector: &Selector) -> Result<Option<Element>> {
        // find_element reports "not found" as a CDP error, so go through
        // find_elements to tell absence apart from a broken session
        Ok(self.find_all_in(parent, selector).await?.into_iter().next())
    }

    async fn find_all_in(&self, parent: &Element, selector: &Selector) -> Result<Vec<Element>> {
        self.ensure_open()?;
        parent
            .find_elements(selector.to_css())
            .await
            .map_err(|e| session_err("query", selector, e))
    }

    async fn read_text(&self, element: &Element) -> Result<Option<String>> {
        self.ensure_open()?;
        element
            .inner_text()
            .await
            .map_err(|e| ScraperError::Session(format!("Failed to read text: {}", e)))
    }

    async fn read_attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        self.ensure_open()?;
        element
            .attribute(name)
            .await
            .map_err(|e| ScraperError::Session(format!("Failed to read attribute {}: {}", name, e)))
    }

    async fn script_click(&self, element: &Element) -> Result<()> {
        self.ensure_open()?;
        element
            .call_js_fn(CLICK_FN, false)
            .await
            .map_err(|e| ScraperError::Session(format!("Script click failed: {}", e)))?;
        Ok(())
    }

    async fn terminate(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();

        closed
            .map(|_| ())
            .map_err(|e| ScraperError::Browser(format!("Failed to close browser: {}", e)))
    }
}
