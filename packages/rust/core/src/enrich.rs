//! Enrichment stage: result CSVs → filtered accounts.
//!
//! Visits each collected author's profile once, parses the follower count
//! and bio, and keeps accounts at or above the configured minimum. The
//! survivors land in `input/filtered_accounts.csv` sorted by follower
//! count, largest first.

use std::collections::HashSet;
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{error, info, warn};

use reachout_browser::{OperatorGate, PageDriver, session};
use reachout_shared::{AppConfig, ProfileRecord, ReachoutError, Result, parse_follower_count};
use reachout_storage::{self as storage, AccountRef, ProjectLayout};

use crate::selectors;

/// Summary of a completed enrichment run.
#[derive(Debug, Default, Clone)]
pub struct EnrichSummary {
    /// Result files read (skipped files count too).
    pub files_processed: usize,
    /// Unique profiles actually visited.
    pub profiles_visited: usize,
    /// Profiles that met the follower threshold.
    pub profiles_kept: usize,
}

/// Enrich every unique account found across the result CSVs.
///
/// Missing result files and login failure abort the run with an error log
/// and a partial summary; an unreadable result file or a profile that
/// fails to render is warned about and skipped.
pub async fn enrich_profiles(
    driver: &dyn PageDriver,
    gate: &dyn OperatorGate,
    config: &AppConfig,
    layout: &ProjectLayout,
) -> Result<EnrichSummary> {
    let mut summary = EnrichSummary::default();

    let result_dir = layout.result_dir();
    let files = storage::list_result_files(&result_dir)?;
    if files.is_empty() {
        error!(dir = %result_dir.display(), "no result files found, run the search stage first");
        return Ok(summary);
    }

    let login_window = Duration::from_secs(config.waits.login_wait_secs);
    if !session::log_in(driver, gate, &config.site.base_url, login_window).await? {
        return Ok(summary);
    }

    let min_followers = config.filters.min_followers;
    let profile_delay = Duration::from_millis(config.waits.profile_delay_ms);
    let mut visited: HashSet<String> = HashSet::new();
    let mut kept: Vec<ProfileRecord> = Vec::new();

    for file in &files {
        summary.files_processed += 1;
        info!(file = %file.display(), "processing result file");

        let refs = match storage::read_account_refs(file) {
            Ok(refs) => refs,
            Err(e) => {
                warn!(file = %file.display(), error = %e, "unreadable result file, skipping");
                continue;
            }
        };

        for account in &refs {
            // An account can appear in several result files; visit it once.
            if !visited.insert(account.username.clone()) {
                continue;
            }

            match fetch_profile(driver, config, account).await {
                Ok(profile) => {
                    summary.profiles_visited += 1;
                    if profile.followers >= min_followers {
                        info!(
                            username = %profile.username,
                            followers = profile.followers,
                            "account kept"
                        );
                        kept.push(profile);
                    } else {
                        info!(
                            username = %profile.username,
                            followers = profile.followers,
                            min_followers,
                            "below follower minimum, discarded"
                        );
                    }
                }
                Err(e) => {
                    warn!(username = %account.username, error = %e, "profile visit failed, skipping");
                }
            }

            // Delay between profile visits (rate-limit avoidance).
            driver.sleep(profile_delay).await;
        }
    }

    summary.profiles_kept = kept.len();
    if kept.is_empty() {
        warn!(min_followers, "no accounts met the follower threshold, nothing written");
        return Ok(summary);
    }

    kept.sort_by(|a, b| b.followers.cmp(&a.followers));
    let out_path = layout.filtered_accounts_file();
    storage::write_profiles(&out_path, &kept)?;
    info!(
        kept = kept.len(),
        visited = summary.profiles_visited,
        path = %out_path.display(),
        "filtered accounts written"
    );

    Ok(summary)
}

/// Visit one profile page and extract its follower count and bio.
async fn fetch_profile(
    driver: &dyn PageDriver,
    config: &AppConfig,
    account: &AccountRef,
) -> Result<ProfileRecord> {
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

    let source = driver.page_source().await?;
    let doc = Html::parse_document(&source);

    // Both elements are routinely absent (hidden counts, empty bios).
    let follower_text = select_text(&doc, selectors::FOLLOWER_COUNT).unwrap_or_else(|| "0".into());
    let bio = select_text(&doc, selectors::BIO).unwrap_or_default();

    Ok(ProfileRecord {
        username: account.username.clone(),
        url: account.url.clone(),
        bio,
        followers: parse_follower_count(&follower_text),
    })
}

/// Trimmed text of the first element matching `css`, if any.
fn select_text(doc: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
