//! CLI entry point for the harvester tool.

use anyhow::{Context, Result};
use clap::Parser;
use harvester_core::{HttpClient, run_harvest};
use tracing::{debug, info};

mod app_config;
mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let loaded = app_config::load_config(args.config.as_deref())?;
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), "loaded config file");
    }
    let config = app_config::build_harvest_config(&args, loaded.config.as_ref())
        .context("Invalid configuration")?;

    info!(
        base_domain = %config.base_domain,
        seeds = config.seed_urls.len(),
        output_dir = %config.output_dir.display(),
        "Harvester starting"
    );

    let client = HttpClient::with_settings(config.client_settings())
        .context("Failed to build HTTP client")?;

    let report = run_harvest(&config, &client).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
