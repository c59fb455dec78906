//! Scripted in-memory page driver for tests.
//!
//! Plays the role a mock HTTP server plays for an HTTP crawler: stages run
//! against stubbed page sources, redirects, and script results without a
//! real browser. Selector checks reuse `scraper` so fake pages behave like
//! rendered HTML.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};

use reachout_shared::Result;

use crate::driver::PageDriver;

/// An in-memory [`PageDriver`] whose pages and script results are scripted
/// up front. Navigations and clicks are recorded for assertions.
#[derive(Default)]
pub struct FakeDriver {
    /// url → page source served on navigation.
    pages: Mutex<HashMap<String, String>>,
    /// goto url → landed url (simulates redirects, e.g. login → /home).
    redirects: Mutex<HashMap<String, String>>,
    /// Results handed out by `execute`, in order. Empty queue → JSON null.
    script_results: Mutex<VecDeque<serde_json::Value>>,
    current: Mutex<String>,
    visits: Mutex<Vec<String>>,
    clicks: Mutex<Vec<String>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` whenever the driver navigates to `url`.
    pub fn stub_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.lock().unwrap().insert(url.into(), html.into());
    }

    /// Land on `to` when the driver navigates to `from`.
    pub fn stub_redirect(&self, from: impl Into<String>, to: impl Into<String>) {
        self.redirects
            .lock()
            .unwrap()
            .insert(from.into(), to.into());
    }

    /// Queue the next `execute` result.
    pub fn push_script_result(&self, value: serde_json::Value) {
        self.script_results.lock().unwrap().push_back(value);
    }

    /// Every URL passed to `goto`, in order.
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    /// Every selector passed to `click`, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    fn current_source(&self) -> String {
        let current = self.current.lock().unwrap().clone();
        self.pages
            .lock()
            .unwrap()
            .get(&current)
            .cloned()
            .unwrap_or_default()
    }

    fn selector_matches(&self, css: &str) -> bool {
        let Ok(selector) = Selector::parse(css) else {
            return false;
        };
        let doc = Html::parse_document(&self.current_source());
        doc.select(&selector).next().is_some()
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visits.lock().unwrap().push(url.to_string());
        let landed = self
            .redirects
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        *self.current.lock().unwrap() = landed;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn wait_for(&self, css: &str, _timeout: Duration) -> Result<bool> {
        Ok(self.selector_matches(css))
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.current_source())
    }

    async fn click(&self, css: &str) -> Result<bool> {
        self.clicks.lock().unwrap().push(css.to_string());
        Ok(self.selector_matches(css))
    }

    async fn execute(&self, _script: &str) -> Result<serde_json::Value> {
        Ok(self
            .script_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(serde_json::Value::Null))
    }

    async fn sleep(&self, _duration: Duration) {
        // No real time passes in tests.
    }
}
