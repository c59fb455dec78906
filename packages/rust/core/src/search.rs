//! Search stage: keyword sheet → per-query result CSVs.
//!
//! Flow per run: manual login, then for each query navigate to the live
//! search, scroll-collect post authors until the cap or end of content,
//! and persist the rows to a filename that encodes the query's keywords.

use std::time::Duration;

use chrono::Local;
use scraper::{Html, Selector};
use tracing::{error, info, warn};

use reachout_browser::{OperatorGate, PageDriver, session};
use reachout_keywords::{filename, parse_keyword_sheet};
use reachout_shared::{AppConfig, PostRecord, ReachoutError, Result, SearchQuery};
use reachout_storage::{self as storage, ProjectLayout};

use crate::selectors;

const SCROLL_HEIGHT_JS: &str = "return document.body.scrollHeight;";
const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Summary of a completed search run.
#[derive(Debug, Default, Clone)]
pub struct SearchSummary {
    /// Queries attempted (including ones abandoned on render timeout).
    pub queries_attempted: usize,
    /// Total rows collected across all queries.
    pub posts_collected: usize,
    /// Result files written (queries with zero rows write nothing).
    pub files_written: usize,
}

/// Run every query from the keyword sheet and write one result CSV each.
///
/// Modeled aborts (missing sheet, empty sheet, login failure) log at error
/// level and return the partial summary; per-query failures warn and move
/// on to the next query.
pub async fn run_searches(
    driver: &dyn PageDriver,
    gate: &dyn OperatorGate,
    config: &AppConfig,
    layout: &ProjectLayout,
) -> Result<SearchSummary> {
    let mut summary = SearchSummary::default();
    let date = Local::now().format("%Y%m%d").to_string();

    let keywords_path = layout.keywords_file();
    if !keywords_path.exists() {
        error!(path = %keywords_path.display(), "keyword sheet not found");
        return Ok(summary);
    }

    let (headers, rows) = storage::read_keyword_sheet(&keywords_path)?;
    let queries = parse_keyword_sheet(&headers, &rows);
    if queries.is_empty() {
        error!(path = %keywords_path.display(), "keyword sheet produced no queries");
        return Ok(summary);
    }
    info!(queries = queries.len(), "loaded search queries");

    let login_window = Duration::from_secs(config.waits.login_wait_secs);
    if !session::log_in(driver, gate, &config.site.base_url, login_window).await? {
        return Ok(summary);
    }

    let cooldown = Duration::from_secs(config.waits.query_cooldown_secs);

    for query in &queries {
        summary.queries_attempted += 1;
        info!(query = %query.text, operator = %query.operator, "searching");

        match collect_query(driver, config, query).await {
            Ok(posts) => {
                summary.posts_collected += posts.len();
                if posts.is_empty() {
                    warn!(query = %query.text, "no results collected, skipping write");
                } else {
                    let name = filename::encode(&query.keywords, &query.operator, &date);
                    let path = layout.result_dir().join(&name);
                    storage::write_posts(&path, &posts)?;
                    info!(count = posts.len(), path = %path.display(), "saved results");
                    summary.files_written += 1;
                }
            }
            Err(e) => {
                warn!(query = %query.text, error = %e, "query abandoned");
            }
        }

        // Cooldown between queries (rate-limit avoidance).
        driver.sleep(cooldown).await;
    }

    info!(
        queries = summary.queries_attempted,
        posts = summary.posts_collected,
        files = summary.files_written,
        "search run finished"
    );
    Ok(summary)
}

/// Navigate to one query's live search and scroll-collect its rows.
async fn collect_query(
    driver: &dyn PageDriver,
    config: &AppConfig,
    query: &SearchQuery,
) -> Result<Vec<PostRecord>> {
    let encoded = query.text.replace(' ', "%20").replace('#', "%23");
    let url = format!(
        "{}/search?q={encoded}&src=typed_query&f=live",
        config.site.base_url
    );
    driver.goto(&url).await?;

    let render_timeout = Duration::from_secs(config.waits.render_timeout_secs);
    if !driver.wait_for(selectors::RESULT_ROW, render_timeout).await? {
        return Err(ReachoutError::Browser(format!(
            "no results rendered within {}s for {url}",
            render_timeout.as_secs()
        )));
    }

    let max_posts = config.limits.max_posts_per_query;
    let settle = Duration::from_millis(config.waits.scroll_settle_ms);
    let mut posts: Vec<PostRecord> = Vec::new();
    let mut previous_height = 0u64;

    loop {
        let source = driver.page_source().await?;
        collect_new_rows(&source, &config.site.base_url, &query.text, max_posts, &mut posts);

        if posts.len() >= max_posts {
            break;
        }

        // Page height unchanged after a scroll means end of content.
        let height = driver
            .execute(SCROLL_HEIGHT_JS)
            .await?
            .as_u64()
            .unwrap_or(0);
        if height == previous_height {
            break;
        }

        driver.execute(SCROLL_TO_BOTTOM_JS).await?;
        driver.sleep(settle).await;
        previous_height = height;
    }

    Ok(posts)
}

/// Extract rows from result elements not yet collected.
///
/// A row missing its author link is skipped, not fatal; every other
/// sub-element degrades to an empty string.
fn collect_new_rows(
    html: &str,
    site_base: &str,
    query_text: &str,
    max_posts: usize,
    posts: &mut Vec<PostRecord>,
) {
    let row_sel = Selector::parse(selectors::RESULT_ROW).unwrap();
    let author_sel = Selector::parse(selectors::AUTHOR_LINK).unwrap();
    let link_sel = Selector::parse(selectors::POST_LINK).unwrap();
    let text_sel = Selector::parse(selectors::POST_TEXT).unwrap();
    let time_sel = Selector::parse(selectors::POST_TIME).unwrap();

    let doc = Html::parse_document(html);

    for row in doc.select(&row_sel).skip(posts.len()) {
        if posts.len() >= max_posts {
            break;
        }

        let Some(href) = row
            .select(&author_sel)
            .next()
            .and_then(|el| el.value().attr("href"))
        else {
            continue;
        };
        let username = href.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        if username.is_empty() {
            continue;
        }

        let tweet_url = row
            .select(&link_sel)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|href| format!("{site_base}{href}"))
            .unwrap_or_default();

        let tweet_content = row
            .select(&text_sel)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();

        let tweeted_at = row
            .select(&time_sel)
            .next()
            .and_then(|el| el.value().attr("datetime"))
            .unwrap_or_default()
            .to_string();

        posts.push(PostRecord {
            username: username.to_string(),
            url: format!("{site_base}/{username}"),
            bio: String::new(),
            followers: 0,
            tweet_url,
            tweet_content,
            tweeted_at,
            query: query_text.to_string(),
        });

        if posts.len() % 10 == 0 {
            info!(collected = posts.len(), "collecting results");
        }
    }
}
