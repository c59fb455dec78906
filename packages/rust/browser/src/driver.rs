//! Page-driver abstraction over the WebDriver session.
//!
//! Every stage depends only on [`PageDriver`], never on thirtyfour
//! directly, so tests can substitute [`crate::fake::FakeDriver`] for a
//! real browser. Element extraction happens by parsing [`page_source`]
//! with `scraper` selectors rather than per-element WebDriver round-trips.
//!
//! [`page_source`]: PageDriver::page_source

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;
use tracing::debug;

use reachout_shared::{ReachoutError, Result};

/// Poll interval for bounded render waits.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The browser surface a stage is allowed to touch.
///
/// All waits are bounded except [`sleep`], which is a fixed rate-limit
/// delay. Timeouts are reported as `Ok(false)`, never retried here; each
/// call site decides whether a missed render is fatal or skips one item.
///
/// [`sleep`]: PageDriver::sleep
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL.
    async fn goto(&self, url: &str) -> Result<()>;

    /// The URL the browser currently shows (after any redirects).
    async fn current_url(&self) -> Result<String>;

    /// Bounded wait for a CSS selector to match a rendered element.
    /// Returns `false` on timeout; `Err` only on driver failure.
    async fn wait_for(&self, css: &str, timeout: Duration) -> Result<bool>;

    /// Full rendered page source.
    async fn page_source(&self) -> Result<String>;

    /// Click the first element matching the selector.
    /// Returns `false` when no element matches.
    async fn click(&self, css: &str) -> Result<bool>;

    /// Evaluate a JavaScript snippet and return its JSON result.
    async fn execute(&self, script: &str) -> Result<serde_json::Value>;

    /// Fixed-duration sleep (rate-limit mitigation, scroll settling).
    async fn sleep(&self, duration: Duration);
}

/// A real browser page driven over the WebDriver protocol.
///
/// The browser runs headed: the operator has to see the page to complete
/// the manual login. One instance per stage invocation, quit at stage end.
pub struct WebDriverPage {
    driver: WebDriver,
}

impl WebDriverPage {
    /// Connect to a WebDriver endpoint (chromedriver) and open a window.
    pub async fn connect(webdriver_url: &str) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--window-size=1280,800").map_err(browser_err)?;
        caps.add_arg("--disable-blink-features=AutomationControlled")
            .map_err(browser_err)?;

        let driver = WebDriver::new(webdriver_url, caps).await.map_err(|e| {
            ReachoutError::Browser(format!(
                "failed to connect to WebDriver at {webdriver_url}: {e}"
            ))
        })?;

        Ok(Self { driver })
    }

    /// Close the browser session.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await.map_err(browser_err)
    }
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!(url, "navigating");
        self.driver.goto(url).await.map_err(browser_err)
    }

    async fn current_url(&self) -> Result<String> {
        let url = self.driver.current_url().await.map_err(browser_err)?;
        Ok(url.to_string())
    }

    async fn wait_for(&self, css: &str, timeout: Duration) -> Result<bool> {
        self.driver
            .query(By::Css(css))
            .wait(timeout, WAIT_POLL_INTERVAL)
            .exists()
            .await
            .map_err(browser_err)
    }

    async fn page_source(&self) -> Result<String> {
        self.driver.source().await.map_err(browser_err)
    }

    async fn click(&self, css: &str) -> Result<bool> {
        let elements = self
            .driver
            .find_all(By::Css(css))
            .await
            .map_err(browser_err)?;
        match elements.first() {
            Some(element) => {
                element.click().await.map_err(browser_err)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn execute(&self, script: &str) -> Result<serde_json::Value> {
        let ret = self
            .driver
            .execute(script, Vec::new())
            .await
            .map_err(browser_err)?;
        Ok(ret.json().clone())
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

fn browser_err(e: thirtyfour::error::WebDriverError) -> ReachoutError {
    ReachoutError::Browser(e.to_string())
}
