//! Manual login flow shared by every browser-driven stage.

use std::time::Duration;

use tracing::{error, info};
use url::Url;

use reachout_shared::{ReachoutError, Result};

use crate::driver::PageDriver;
use crate::gate::OperatorGate;

/// Open the site's login page, hand control to the operator for the wait
/// window, then check whether the session landed on the home timeline.
///
/// Returns `Ok(false)` when the post-wait location does not indicate a
/// logged-in state; the caller must treat that as fatal to its stage run.
pub async fn log_in(
    driver: &dyn PageDriver,
    gate: &dyn OperatorGate,
    site_base: &str,
    window: Duration,
) -> Result<bool> {
    let host = Url::parse(site_base)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .ok_or_else(|| ReachoutError::config(format!("invalid site base URL: {site_base}")))?;

    let login_url = format!("{site_base}/login");
    driver.goto(&login_url).await?;
    info!(url = %login_url, window_secs = window.as_secs(), "waiting for manual login");

    gate.wait_for_login(window).await;

    let landed = driver.current_url().await?;
    if landed.contains(&format!("{host}/home")) {
        info!("login successful");
        Ok(true)
    } else {
        error!(url = %landed, "login failed or timed out");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeDriver;
    use crate::gate::ScriptedGate;

    const SITE: &str = "https://twitter.com";

    #[tokio::test]
    async fn login_detected_when_redirected_home() {
        let driver = FakeDriver::new();
        driver.stub_redirect("https://twitter.com/login", "https://twitter.com/home");
        let gate = ScriptedGate::new();

        let ok = log_in(&driver, &gate, SITE, Duration::from_secs(60))
            .await
            .unwrap();

        assert!(ok);
        assert_eq!(gate.login_waits(), vec![Duration::from_secs(60)]);
    }

    #[tokio::test]
    async fn login_failure_when_still_on_login_page() {
        let driver = FakeDriver::new();
        let gate = ScriptedGate::new();

        let ok = log_in(&driver, &gate, SITE, Duration::from_secs(60))
            .await
            .unwrap();

        assert!(!ok);
    }

    #[tokio::test]
    async fn invalid_base_url_is_a_config_error() {
        let driver = FakeDriver::new();
        let gate = ScriptedGate::new();

        let result = log_in(&driver, &gate, "not a url", Duration::ZERO).await;
        assert!(result.is_err());
    }
}
