//! Command line entry point for the campsite checker.
//! Runs the configured campground checks against recreation.gov and writes a
//! status report.

mod cli;
mod config;
mod report;
mod runner;

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rec_gov::RecGovClient;

use crate::cli::{Cli, Command};
use crate::config::Config;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_level));

    if let Err(e) = run(cli).await {
        log::error!("❌ {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    log::info!("📋 Loaded {} tasks from {}", config.tasks.len(), cli.config.display());

    let client_config = config.client.clone().with_env_api_key();
    if client_config.api_key.is_none() {
        log::warn!("🔑 No RIDB API key configured, campsite lookups will fail");
    }
    let page_size = client_config.page_size;
    let client = Arc::new(RecGovClient::new(client_config)?);

    match cli.command {
        Command::Check(args) => check(&config, client, page_size, &args.status).await,
        Command::SiteTypes => site_types(&config, &client, page_size).await,
    }
}

async fn check(
    config: &Config,
    client: Arc<RecGovClient>,
    page_size: usize,
    status: &Path,
) -> Result<()> {
    log::info!("🚀 Starting campsite check...");

    let reports =
        runner::run_all(client.as_ref(), client.clone(), &config.tasks, page_size).await?;
    report::write_status(status, &reports)?;

    let open: usize = reports.iter().map(|r| r.sites.len()).sum();
    log::info!(
        "📁 Wrote status for {} tasks ({} open sites) to {}",
        reports.len(),
        open,
        status.display()
    );
    Ok(())
}

async fn site_types(config: &Config, client: &RecGovClient, page_size: usize) -> Result<()> {
    let types = runner::survey_site_types(client, &config.tasks, page_size).await?;
    for site_type in types {
        println!("{}", site_type);
    }
    Ok(())
}
