//! Send stage: human-gated DM session.
//!
//! For each filtered account with a draft from today, opens the profile,
//! pops the compose drawer, shows the draft in the terminal, and blocks
//! until the operator confirms. The tool never types or sends anything
//! itself; the operator pastes and sends by hand.

use std::time::Duration;

use chrono::Local;
use tracing::{error, info, warn};

use reachout_browser::{OperatorGate, PageDriver, session};
use reachout_shared::{AppConfig, ProfileRecord, ReachoutError, Result};
use reachout_storage::{self as storage, ProjectLayout};

use crate::selectors;

/// Pause after closing the compose drawer.
const POST_CLOSE_PAUSE: Duration = Duration::from_secs(2);

/// Summary of a completed send session.
#[derive(Debug, Default, Clone)]
pub struct SendSummary {
    /// Accounts iterated (including skips).
    pub accounts_processed: usize,
    /// Accounts skipped because today's draft file was missing.
    pub drafts_missing: usize,
    /// Compose drawers opened and confirmed by the operator.
    pub dms_opened: usize,
}

/// Walk the filtered accounts and gate each DM on operator confirmation.
///
/// Missing accounts file and login failure abort with an error log; a
/// missing draft, absent message button, or failed profile render skips
/// that account with a warning. The final confirmation lets the operator
/// finish up before the caller closes the browser.
pub async fn launch_send_session(
    driver: &dyn PageDriver,
    gate: &dyn OperatorGate,
    config: &AppConfig,
    layout: &ProjectLayout,
) -> Result<SendSummary> {
    let mut summary = SendSummary::default();
    let date = Local::now().format("%Y%m%d").to_string();

    let accounts_path = layout.filtered_accounts_file();
    if !accounts_path.exists() {
        error!(path = %accounts_path.display(), "filtered accounts not found, run the enrich stage first");
        return Ok(summary);
    }
    let accounts = match storage::read_profiles(&accounts_path) {
        Ok(accounts) => accounts,
        Err(e) => {
            error!(path = %accounts_path.display(), error = %e, "could not read filtered accounts");
            return Ok(summary);
        }
    };

    let login_window = Duration::from_secs(config.waits.login_wait_secs);
    if session::log_in(driver, gate, &config.site.base_url, login_window).await? {
        for account in &accounts {
            summary.accounts_processed += 1;

            let draft_path = layout.draft_file(&account.username, &date);
            if !draft_path.exists() {
                warn!(
                    username = %account.username,
                    path = %draft_path.display(),
                    "no draft for today, skipping"
                );
                summary.drafts_missing += 1;
                continue;
            }
            let draft = match std::fs::read_to_string(&draft_path) {
                Ok(draft) => draft,
                Err(e) => {
                    warn!(username = %account.username, error = %e, "unreadable draft, skipping");
                    summary.drafts_missing += 1;
                    continue;
                }
            };

            match open_compose(driver, gate, config, account, &draft).await {
                Ok(true) => summary.dms_opened += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(username = %account.username, error = %e, "skipping account");
                }
            }
        }

        info!(
            processed = summary.accounts_processed,
            opened = summary.dms_opened,
            missing_drafts = summary.drafts_missing,
            "send session finished"
        );
    }

    // Let the operator finish anything in-flight before the browser closes.
    gate.confirm("Press Enter to close the browser").await?;

    Ok(summary)
}

/// Open one account's compose drawer and wait for operator confirmation.
///
/// `Ok(false)` means the profile has no message button (DMs closed); the
/// caller skips the account.
async fn open_compose(
    driver: &dyn PageDriver,
    gate: &dyn OperatorGate,
    config: &AppConfig,
    account: &ProfileRecord,
    draft: &str,
) -> Result<bool> {
    driver.goto(&account.url).await?;

    let render_timeout = Duration::from_secs(config.waits.render_timeout_secs);
    if !driver
        .wait_for(selectors::PRIMARY_COLUMN, render_timeout)
        .await?
    {
        return Err(ReachoutError::Browser(format!(
            "profile did not render: {}",
            account.url
        )));
    }

    if !driver.click(selectors::DM_BUTTON).await? {
        warn!(username = %account.username, "no message button on profile, skipping");
        return Ok(false);
    }
    if !driver.wait_for(selectors::DM_DRAWER, render_timeout).await? {
        return Err(ReachoutError::Browser(format!(
            "compose drawer did not open for {}",
            account.username
        )));
    }

    println!("\n{}", "=".repeat(50));
    println!("Draft for @{}:", account.username);
    println!("{}", "-".repeat(50));
    println!("{draft}");
    println!("{}", "=".repeat(50));

    gate.confirm(&format!(
        "Paste and send the DM to @{} in the browser, then press Enter",
        account.username
    ))
    .await?;

    if driver.click(selectors::DM_CLOSE).await? {
        driver.sleep(POST_CLOSE_PAUSE).await;
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reachout_browser::fake::FakeDriver;
    use reachout_browser::gate::ScriptedGate;

    const SITE: &str = "https://twitter.com";

    fn profile_page_with_dm() -> &'static str {
        r#"<html><body>
            <div data-testid="primaryColumn">
                <a href="/x/message"><span><span>Message</span></span></a>
            </div>
            <div data-testid="DMDrawer"><div role="button">close</div></div>
        </body></html>"#
    }

    fn profile_page_no_dm() -> &'static str {
        r#"<html><body><div data-testid="primaryColumn"></div></body></html>"#
    }

    fn profile(username: &str) -> ProfileRecord {
        ProfileRecord {
            username: username.into(),
            url: format!("{SITE}/{username}"),
            bio: String::new(),
            followers: 20_000,
        }
    }

    fn seed(layout: &ProjectLayout, accounts: &[ProfileRecord], drafts_for: &[&str]) {
        storage::write_profiles(&layout.filtered_accounts_file(), accounts).unwrap();
        let date = Local::now().format("%Y%m%d").to_string();
        std::fs::create_dir_all(layout.generated_dir()).unwrap();
        for username in drafts_for {
            std::fs::write(layout.draft_file(username, &date), format!("hi {username}"))
                .unwrap();
        }
    }

    fn logged_in_driver() -> FakeDriver {
        let driver = FakeDriver::new();
        driver.stub_redirect("https://twitter.com/login", "https://twitter.com/home");
        driver
    }

    #[tokio::test]
    async fn opens_drawer_and_waits_for_confirmation_per_account() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("alice"), profile("bob")], &["alice", "bob"]);

        let driver = logged_in_driver();
        driver.stub_page(format!("{SITE}/alice"), profile_page_with_dm());
        driver.stub_page(format!("{SITE}/bob"), profile_page_with_dm());

        let gate = ScriptedGate::new();
        let summary = launch_send_session(&driver, &gate, &AppConfig::default(), &layout)
            .await
            .unwrap();

        assert_eq!(summary.accounts_processed, 2);
        assert_eq!(summary.dms_opened, 2);

        let confirmations = gate.confirmations();
        assert_eq!(confirmations.len(), 3);
        assert!(confirmations[0].contains("@alice"));
        assert!(confirmations[1].contains("@bob"));
        assert!(confirmations[2].contains("close the browser"));

        let clicks = driver.clicks();
        assert!(clicks.contains(&selectors::DM_BUTTON.to_string()));
        assert!(clicks.contains(&selectors::DM_CLOSE.to_string()));
    }

    #[tokio::test]
    async fn missing_draft_skips_account() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("alice"), profile("bob")], &["alice"]);

        let driver = logged_in_driver();
        driver.stub_page(format!("{SITE}/alice"), profile_page_with_dm());

        let gate = ScriptedGate::new();
        let summary = launch_send_session(&driver, &gate, &AppConfig::default(), &layout)
            .await
            .unwrap();

        assert_eq!(summary.accounts_processed, 2);
        assert_eq!(summary.dms_opened, 1);
        assert_eq!(summary.drafts_missing, 1);
        assert!(!driver.visits().contains(&format!("{SITE}/bob")));
    }

    #[tokio::test]
    async fn closed_dms_skip_without_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("private")], &["private"]);

        let driver = logged_in_driver();
        driver.stub_page(format!("{SITE}/private"), profile_page_no_dm());

        let gate = ScriptedGate::new();
        let summary = launch_send_session(&driver, &gate, &AppConfig::default(), &layout)
            .await
            .unwrap();

        assert_eq!(summary.accounts_processed, 1);
        assert_eq!(summary.dms_opened, 0);
        // Only the final close-the-browser confirmation fired.
        assert_eq!(gate.confirmations().len(), 1);
    }

    #[tokio::test]
    async fn login_failure_still_offers_final_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("alice")], &["alice"]);

        // No redirect stub: login fails.
        let driver = FakeDriver::new();
        let gate = ScriptedGate::new();
        let summary = launch_send_session(&driver, &gate, &AppConfig::default(), &layout)
            .await
            .unwrap();

        assert_eq!(summary.accounts_processed, 0);
        assert_eq!(gate.confirmations().len(), 1);
    }

    #[tokio::test]
    async fn missing_accounts_file_aborts_before_browser() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());

        let driver = FakeDriver::new();
        let gate = ScriptedGate::new();
        let summary = launch_send_session(&driver, &gate, &AppConfig::default(), &layout)
            .await
            .unwrap();

        assert_eq!(summary.accounts_processed, 0);
        assert!(driver.visits().is_empty());
        assert!(gate.confirmations().is_empty());
    }
}
