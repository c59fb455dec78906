//! CLI command definitions, routing, and stage wiring.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::warn;

use reachout_browser::{InteractiveGate, WebDriverPage};
use reachout_shared::{AppConfig, init_config, load_config};
use reachout_storage::ProjectLayout;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Reachout — find accounts by keyword and draft DMs for manual outreach.
#[derive(Parser)]
#[command(
    name = "reachout",
    version,
    about = "Search keywords, filter accounts by reach, and draft DMs for manual sending.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Project directory holding config/, result/, input/ and dm/.
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run every keyword-sheet query and collect result CSVs.
    Search,

    /// Visit collected profiles and keep accounts above the follower minimum.
    Enrich {
        /// Override the configured minimum follower count.
        #[arg(long)]
        min_followers: Option<u64>,
    },

    /// Generate DM drafts from the template and filtered accounts.
    Generate {
        /// Override the configured campaign base URL.
        #[arg(long)]
        campaign_url: Option<String>,
    },

    /// Open each profile's compose drawer and gate on operator confirmation.
    Send,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Search => cmd_search(&cli.root).await,
        Command::Enrich { min_followers } => cmd_enrich(&cli.root, min_followers).await,
        Command::Generate { campaign_url } => cmd_generate(&cli.root, campaign_url),
        Command::Send => cmd_send(&cli.root).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&cli.root),
            ConfigAction::Show => cmd_config_show(&cli.root),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_search(root: &Path) -> Result<()> {
    let config = load_config(root)?;
    let layout = ProjectLayout::new(root);

    let driver = WebDriverPage::connect(&config.site.webdriver_url).await?;
    let gate = InteractiveGate;
    let result = reachout_core::run_searches(&driver, &gate, &config, &layout).await;
    close_browser(driver).await;
    let summary = result?;

    println!();
    println!("  Search finished");
    println!("  Queries: {}", summary.queries_attempted);
    println!("  Posts:   {}", summary.posts_collected);
    println!("  Files:   {}", summary.files_written);
    println!();

    Ok(())
}

async fn cmd_enrich(root: &Path, min_followers: Option<u64>) -> Result<()> {
    let mut config = load_config(root)?;
    if let Some(min) = min_followers {
        config.filters.min_followers = min;
    }
    let layout = ProjectLayout::new(root);

    let driver = WebDriverPage::connect(&config.site.webdriver_url).await?;
    let gate = InteractiveGate;
    let result = reachout_core::enrich_profiles(&driver, &gate, &config, &layout).await;
    close_browser(driver).await;
    let summary = result?;

    println!();
    println!("  Enrichment finished");
    println!("  Files:   {}", summary.files_processed);
    println!("  Visited: {}", summary.profiles_visited);
    println!("  Kept:    {}", summary.profiles_kept);
    println!();

    Ok(())
}

fn cmd_generate(root: &Path, campaign_url: Option<String>) -> Result<()> {
    let mut config = load_config(root)?;
    if let Some(url) = campaign_url {
        config.campaign.base_url = url;
    }
    let layout = ProjectLayout::new(root);

    let summary = reachout_core::generate_drafts(&config, &layout)?;

    println!();
    println!("  Draft generation finished");
    println!("  Drafts:  {}", summary.drafts_written);
    println!();

    Ok(())
}

async fn cmd_send(root: &Path) -> Result<()> {
    let config = load_config(root)?;
    let layout = ProjectLayout::new(root);

    let driver = WebDriverPage::connect(&config.site.webdriver_url).await?;
    let gate = InteractiveGate;
    let result = reachout_core::launch_send_session(&driver, &gate, &config, &layout).await;
    close_browser(driver).await;
    let summary = result?;

    println!();
    println!("  Send session finished");
    println!("  Accounts:       {}", summary.accounts_processed);
    println!("  DMs opened:     {}", summary.dms_opened);
    println!("  Missing drafts: {}", summary.drafts_missing);
    println!();

    Ok(())
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path) -> Result<()> {
    let config: AppConfig = load_config(root)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

/// Quit the browser session; a close failure never masks the stage result.
async fn close_browser(driver: WebDriverPage) {
    if let Err(e) = driver.quit().await {
        warn!(error = %e, "failed to close browser session");
    }
}
