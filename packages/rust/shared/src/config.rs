//! Application configuration for Reachout.
//!
//! User config lives at `<project root>/config/reachout.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReachoutError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "reachout.toml";

/// Config directory name under the project root.
const CONFIG_DIR_NAME: &str = "config";

// ---------------------------------------------------------------------------
// Config structs (matching reachout.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Account filtering thresholds.
    #[serde(default)]
    pub filters: FiltersConfig,

    /// Outreach campaign settings.
    #[serde(default)]
    pub campaign: CampaignConfig,

    /// Target site and WebDriver endpoints.
    #[serde(default)]
    pub site: SiteConfig,

    /// Render waits and rate-limit delays.
    #[serde(default)]
    pub waits: WaitsConfig,

    /// Collection caps.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// `[filters]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    /// Minimum follower count for an account to be kept by enrichment.
    #[serde(default = "default_min_followers")]
    pub min_followers: u64,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            min_followers: default_min_followers(),
        }
    }
}

fn default_min_followers() -> u64 {
    10_000
}

/// `[campaign]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Base campaign URL; each draft appends `?ref=<username>`.
    #[serde(default = "default_campaign_url")]
    pub base_url: String,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            base_url: default_campaign_url(),
        }
    }
}

fn default_campaign_url() -> String {
    "https://example.com/campaign/".into()
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the target site.
    #[serde(default = "default_site_url")]
    pub base_url: String,

    /// WebDriver endpoint the browser session connects through.
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_site_url(),
            webdriver_url: default_webdriver_url(),
        }
    }
}

fn default_site_url() -> String {
    "https://twitter.com".into()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}

/// `[waits]` section.
///
/// All waits are either bounded render waits (fail-fast, no retry) or fixed
/// sleeps used purely for site-side rate-limit avoidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitsConfig {
    /// Window the operator has to complete the manual login.
    #[serde(default = "default_login_wait_secs")]
    pub login_wait_secs: u64,

    /// Bounded wait for a page region to render before giving up.
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,

    /// Settle time after each scroll step.
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,

    /// Cooldown between consecutive search queries.
    #[serde(default = "default_query_cooldown_secs")]
    pub query_cooldown_secs: u64,

    /// Delay after each profile visit.
    #[serde(default = "default_profile_delay_ms")]
    pub profile_delay_ms: u64,
}

impl Default for WaitsConfig {
    fn default() -> Self {
        Self {
            login_wait_secs: default_login_wait_secs(),
            render_timeout_secs: default_render_timeout_secs(),
            scroll_settle_ms: default_scroll_settle_ms(),
            query_cooldown_secs: default_query_cooldown_secs(),
            profile_delay_ms: default_profile_delay_ms(),
        }
    }
}

fn default_login_wait_secs() -> u64 {
    60
}
fn default_render_timeout_secs() -> u64 {
    30
}
fn default_scroll_settle_ms() -> u64 {
    3_000
}
fn default_query_cooldown_secs() -> u64 {
    10
}
fn default_profile_delay_ms() -> u64 {
    3_000
}

/// `[limits]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum posts collected per search query.
    #[serde(default = "default_max_posts_per_query")]
    pub max_posts_per_query: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_posts_per_query: default_max_posts_per_query(),
        }
    }
}

fn default_max_posts_per_query() -> usize {
    100
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`<root>/config/`).
pub fn config_dir(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR_NAME)
}

/// Get the path to the config file (`<root>/config/reachout.toml`).
pub fn config_file_path(root: &Path) -> PathBuf {
    config_dir(root).join(CONFIG_FILE_NAME)
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config(root: &Path) -> Result<AppConfig> {
    let path = config_file_path(root);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ReachoutError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ReachoutError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config(root: &Path) -> Result<PathBuf> {
    let dir = config_dir(root);
    std::fs::create_dir_all(&dir).map_err(|e| ReachoutError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ReachoutError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ReachoutError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("min_followers"));
        assert!(toml_str.contains("webdriver_url"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.filters.min_followers, 10_000);
        assert_eq!(parsed.waits.login_wait_secs, 60);
        assert_eq!(parsed.limits.max_posts_per_query, 100);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[filters]
min_followers = 500

[campaign]
base_url = "https://c/"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.filters.min_followers, 500);
        assert_eq!(config.campaign.base_url, "https://c/");
        assert_eq!(config.site.base_url, "https://twitter.com");
        assert_eq!(config.waits.query_cooldown_secs, 10);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(dir.path()).expect("load");
        assert_eq!(config.filters.min_followers, 10_000);
    }

    #[test]
    fn init_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = init_config(dir.path()).expect("init");
        assert!(path.exists());
        let config = load_config(dir.path()).expect("load");
        assert_eq!(config.site.webdriver_url, "http://localhost:9515");
    }
}
