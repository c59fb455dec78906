//! Shared types, error model, and configuration for Reachout.
//!
//! This crate is the foundation depended on by all other Reachout crates.
//! It provides:
//! - [`ReachoutError`] — the unified error type
//! - Domain types ([`SearchQuery`], [`PostRecord`], [`ProfileRecord`])
//! - Configuration ([`AppConfig`], config loading)
//! - Per-invocation logging setup ([`logging::init`])

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CampaignConfig, FiltersConfig, LimitsConfig, SiteConfig, WaitsConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{ReachoutError, Result};
pub use types::{PostRecord, ProfileRecord, SearchQuery, parse_follower_count};
