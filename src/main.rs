//! Anchorwatch main entry point
//!
//! This is the command-line interface for the Anchorwatch link checker.

use anchorwatch::config::{load_config_with_hash, Config};
use anchorwatch::crawler::run_check;
use anchorwatch::CrawlReport;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Anchorwatch: a site-scoped broken-link and anchor checker
///
/// Anchorwatch crawls every page under ROOT, checks that each linked URL
/// answers successfully, and that every `#fragment` link points at an
/// element id on the target page. Problems are printed to stdout and the
/// exit status is non-zero if there were any.
#[derive(Parser, Debug)]
#[command(name = "anchorwatch")]
#[command(version)]
#[command(about = "A site-scoped broken-link and anchor checker", long_about = None)]
struct Cli {
    /// Root URL to crawl (overrides the config file)
    #[arg(value_name = "ROOT")]
    root: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip links that leave the root instead of checking they exist
    #[arg(long)]
    no_external_links: bool,

    /// Log each URL as it is crawled
    #[arg(short, long)]
    verbose: bool,

    /// Log every discovered link and element id
    #[arg(long)]
    debug: bool,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.debug, cli.quiet);

    match run(cli).await {
        Ok(report) => {
            if let Err(e) = report.write_to(&mut std::io::stdout().lock()) {
                tracing::error!("Failed to print problems: {}", e);
                return ExitCode::from(2);
            }
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on the flags
fn setup_logging(verbose: bool, debug: bool, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else if debug {
        EnvFilter::new("anchorwatch=debug,info")
    } else if verbose {
        EnvFilter::new("anchorwatch=info,warn")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration and runs the check
async fn run(cli: Cli) -> anyhow::Result<CrawlReport> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(root) = cli.root {
        config.crawler.root = Some(root);
    }
    if cli.no_external_links {
        config.crawler.external_links = false;
    }

    let report = run_check(config).await.context("cannot start crawl")?;
    Ok(report)
}
