//! Reachout CLI — keyword search to DM outreach, human-gated end to end.
//!
//! Four stages run as separate invocations against one project directory:
//! search, enrich, generate, send.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    reachout_shared::logging::init(&cli.root, cli.verbose)?;
    commands::run(cli).await
}
