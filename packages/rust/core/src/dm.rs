//! DM draft generation: template + filtered accounts → draft files.
//!
//! Pure file transformation, no browser. Each filtered account gets a
//! per-account draft under `dm/generated/`, plus one combined file with
//! every draft for review. Re-running on the same day overwrites both.

use std::collections::HashMap;
use std::path::Path;

use chrono::Local;
use tracing::{error, info, warn};

use reachout_keywords::decode_keywords;
use reachout_shared::{AppConfig, ProfileRecord, ReachoutError, Result};
use reachout_storage::{self as storage, ProjectLayout};

/// Keyword token used when an account maps to no result file.
const DEFAULT_KEYWORD: &str = "general information";

/// At most this many keyword tokens are rendered into one draft.
const MAX_KEYWORDS_PER_DRAFT: usize = 3;

const USERNAME_PLACEHOLDER: &str = "<<username>>";
const KEYWORD_PLACEHOLDER: &str = "<<keyword>>";
const CAMPAIGN_URL_PLACEHOLDER: &str = "<<campaign_url>>";

/// Summary of a completed draft-generation run.
#[derive(Debug, Default, Clone)]
pub struct DmSummary {
    /// Accounts a draft was written for.
    pub drafts_written: usize,
}

/// Generate one draft per filtered account, plus the combined review file.
///
/// Missing template or accounts file aborts with an error log and no
/// partial output. Generation itself is deterministic for a given
/// (template, accounts, result files, date).
pub fn generate_drafts(config: &AppConfig, layout: &ProjectLayout) -> Result<DmSummary> {
    let mut summary = DmSummary::default();
    let date = Local::now().format("%Y%m%d").to_string();

    let template_path = layout.template_file();
    if !template_path.exists() {
        error!(path = %template_path.display(), "DM template not found");
        return Ok(summary);
    }
    let accounts_path = layout.filtered_accounts_file();
    if !accounts_path.exists() {
        error!(path = %accounts_path.display(), "filtered accounts not found, run the enrich stage first");
        return Ok(summary);
    }

    let template = std::fs::read_to_string(&template_path)
        .map_err(|e| ReachoutError::io(&template_path, e))?;

    let accounts = match storage::read_profiles(&accounts_path) {
        Ok(accounts) => accounts,
        Err(e) => {
            error!(path = %accounts_path.display(), error = %e, "could not read filtered accounts");
            return Ok(summary);
        }
    };
    if accounts.is_empty() {
        error!(path = %accounts_path.display(), "filtered accounts file is empty");
        return Ok(summary);
    }

    let associations = keyword_associations(&layout.result_dir())?;

    let generated_dir = layout.generated_dir();
    std::fs::create_dir_all(&generated_dir).map_err(|e| ReachoutError::io(&generated_dir, e))?;

    let mut combined = String::new();
    combined.push_str(&format!(
        "--- generated at: {} ---\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    combined.push_str(&format!("--- target accounts: {} ---\n\n", accounts.len()));

    for account in &accounts {
        let text = render_draft(&template, account, &associations, &config.campaign.base_url);

        let draft_path = layout.draft_file(&account.username, &date);
        std::fs::write(&draft_path, &text).map_err(|e| ReachoutError::io(&draft_path, e))?;
        summary.drafts_written += 1;

        combined.push_str(&format!("=== @{} ===\n\n", account.username));
        combined.push_str(&text);
        combined.push_str("\n\n-----------------------------------\n\n");

        if summary.drafts_written % 10 == 0 {
            info!(written = summary.drafts_written, "generating drafts");
        }
    }

    let combined_path = layout.combined_drafts_file(&date);
    std::fs::write(&combined_path, combined).map_err(|e| ReachoutError::io(&combined_path, e))?;

    info!(
        drafts = summary.drafts_written,
        combined = %combined_path.display(),
        "draft generation finished"
    );
    Ok(summary)
}

/// Map each username to the keyword tokens decoded from the result files
/// it appears in. Token order follows file order; duplicates collapse.
fn keyword_associations(result_dir: &Path) -> Result<HashMap<String, Vec<String>>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();

    for file in storage::list_result_files(result_dir)? {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let tokens = decode_keywords(stem);

        let usernames = match storage::read_usernames(&file) {
            Ok(usernames) => usernames,
            Err(e) => {
                warn!(file = %file.display(), error = %e, "unreadable result file, skipping");
                continue;
            }
        };

        for username in usernames {
            let entry = map.entry(username).or_default();
            for token in &tokens {
                if !entry.contains(token) {
                    entry.push(token.clone());
                }
            }
        }
    }

    Ok(map)
}

/// Substitute the three placeholders for one account.
fn render_draft(
    template: &str,
    account: &ProfileRecord,
    associations: &HashMap<String, Vec<String>>,
    campaign_base: &str,
) -> String {
    let keyword = associations
        .get(&account.username)
        .filter(|tokens| !tokens.is_empty())
        .map(|tokens| {
            tokens
                .iter()
                .take(MAX_KEYWORDS_PER_DRAFT)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| DEFAULT_KEYWORD.to_string());

    let campaign_url = format!("{campaign_base}?ref={}", account.username);

    template
        .replace(USERNAME_PLACEHOLDER, &account.username)
        .replace(KEYWORD_PLACEHOLDER, &keyword)
        .replace(CAMPAIGN_URL_PLACEHOLDER, &campaign_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reachout_shared::PostRecord;

    const TEMPLATE: &str = "Hi <<username>>, loved your posts about <<keyword>>!\nJoin us: <<campaign_url>>";

    fn profile(username: &str, followers: u64) -> ProfileRecord {
        ProfileRecord {
            username: username.into(),
            url: format!("https://twitter.com/{username}"),
            bio: String::new(),
            followers,
        }
    }

    fn post(username: &str) -> PostRecord {
        PostRecord {
            username: username.into(),
            url: format!("https://twitter.com/{username}"),
            bio: String::new(),
            followers: 0,
            tweet_url: String::new(),
            tweet_content: String::new(),
            tweeted_at: String::new(),
            query: String::new(),
        }
    }

    fn seed(layout: &ProjectLayout, accounts: &[ProfileRecord]) {
        let template_path = layout.template_file();
        std::fs::create_dir_all(template_path.parent().unwrap()).unwrap();
        std::fs::write(&template_path, TEMPLATE).unwrap();
        storage::write_profiles(&layout.filtered_accounts_file(), accounts).unwrap();
    }

    fn write_result_file(layout: &ProjectLayout, name: &str, usernames: &[&str]) {
        let posts: Vec<PostRecord> = usernames.iter().map(|u| post(u)).collect();
        storage::write_posts(&layout.result_dir().join(name), &posts).unwrap();
    }

    #[test]
    fn renders_all_three_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("alice", 20_000)]);
        write_result_file(&layout, "cats_20260829.csv", &["alice"]);

        let summary = generate_drafts(&AppConfig::default(), &layout).unwrap();
        assert_eq!(summary.drafts_written, 1);

        let date = Local::now().format("%Y%m%d").to_string();
        let text = std::fs::read_to_string(layout.draft_file("alice", &date)).unwrap();
        assert!(text.contains("Hi alice"));
        assert!(text.contains("about cats!"));
        assert!(text.contains("https://example.com/campaign/?ref=alice"));
        assert!(!text.contains("<<"));
    }

    #[test]
    fn unmatched_account_gets_default_keyword() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("stranger", 50_000)]);

        generate_drafts(&AppConfig::default(), &layout).unwrap();

        let date = Local::now().format("%Y%m%d").to_string();
        let text = std::fs::read_to_string(layout.draft_file("stranger", &date)).unwrap();
        assert!(text.contains(DEFAULT_KEYWORD));
    }

    #[test]
    fn keywords_capped_at_three_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("alice", 20_000)]);
        write_result_file(&layout, "art_20260829.csv", &["alice"]);
        write_result_file(&layout, "cats_20260829.csv", &["alice"]);
        write_result_file(&layout, "dogs_20260829.csv", &["alice"]);
        write_result_file(&layout, "zebras_20260829.csv", &["alice"]);

        let date = Local::now().format("%Y%m%d").to_string();
        generate_drafts(&AppConfig::default(), &layout).unwrap();
        let text = std::fs::read_to_string(layout.draft_file("alice", &date)).unwrap();

        // Files list sorted by name, so the first three stems win.
        assert!(text.contains("art, cats, dogs"));
        assert!(!text.contains("zebras"));
    }

    #[test]
    fn combined_file_contains_every_draft() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("alice", 20_000), profile("bob", 15_000)]);

        generate_drafts(&AppConfig::default(), &layout).unwrap();

        let date = Local::now().format("%Y%m%d").to_string();
        let combined = std::fs::read_to_string(layout.combined_drafts_file(&date)).unwrap();
        assert!(combined.contains("--- target accounts: 2 ---"));
        assert!(combined.contains("=== @alice ==="));
        assert!(combined.contains("=== @bob ==="));
    }

    #[test]
    fn missing_template_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        storage::write_profiles(&layout.filtered_accounts_file(), &[profile("alice", 20_000)])
            .unwrap();

        let summary = generate_drafts(&AppConfig::default(), &layout).unwrap();
        assert_eq!(summary.drafts_written, 0);
        assert!(!layout.generated_dir().exists());
    }

    #[test]
    fn missing_accounts_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let template_path = layout.template_file();
        std::fs::create_dir_all(template_path.parent().unwrap()).unwrap();
        std::fs::write(&template_path, TEMPLATE).unwrap();

        let summary = generate_drafts(&AppConfig::default(), &layout).unwrap();
        assert_eq!(summary.drafts_written, 0);
        assert!(!layout.generated_dir().exists());
    }

    #[test]
    fn rerun_same_day_overwrites_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("alice", 20_000)]);

        generate_drafts(&AppConfig::default(), &layout).unwrap();
        let date = Local::now().format("%Y%m%d").to_string();
        let first = std::fs::read_to_string(layout.draft_file("alice", &date)).unwrap();

        generate_drafts(&AppConfig::default(), &layout).unwrap();
        let second = std::fs::read_to_string(layout.draft_file("alice", &date)).unwrap();
        assert_eq!(first, second);

        let files: Vec<_> = std::fs::read_dir(layout.generated_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        // One per-account draft plus the combined file, no stray copies.
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn campaign_url_override_flows_into_draft() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        seed(&layout, &[profile("alice", 20_000)]);

        let mut config = AppConfig::default();
        config.campaign.base_url = "https://shop.example/landing".into();
        generate_drafts(&config, &layout).unwrap();

        let date = Local::now().format("%Y%m%d").to_string();
        let text = std::fs::read_to_string(layout.draft_file("alice", &date)).unwrap();
        assert!(text.contains("https://shop.example/landing?ref=alice"));
    }
}
