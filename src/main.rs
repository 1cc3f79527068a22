//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest catalogue crawler.

use anyhow::Context;
use catalog_harvest::config::{self, load_config_with_hash, Config, ListingFailurePolicy};
use catalog_harvest::crawler::Coordinator;
use catalog_harvest::output::{
    export_categories_reserving, print_summary, write_image_log, RunSummary,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a sequential catalogue crawler
///
/// Catalog-Harvest walks paginated listing pages, extracts one record per
/// product page, optionally downloads product images, and writes one CSV
/// file per category.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version)]
#[command(about = "A sequential catalogue crawler with per-category CSV export", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// First listing page to crawl
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Maximum number of listing pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Pause between product fetches, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Download product images
    #[arg(long, conflicts_with = "no_images")]
    images: bool,

    /// Skip product images
    #[arg(long, conflicts_with = "images")]
    no_images: bool,

    /// Directory for the category CSV files
    #[arg(long, value_name = "DIR")]
    csv_dir: Option<String>,

    /// Directory for downloaded images
    #[arg(long, value_name = "DIR")]
    images_dir: Option<String>,

    /// Fail the run when a listing page cannot be fetched
    #[arg(long)]
    abort_on_listing_error: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.start_url {
            config.crawler.start_url = url.clone();
        }
        if let Some(n) = self.max_pages {
            config.crawler.max_pages = Some(n);
        }
        if let Some(ms) = self.delay_ms {
            config.crawler.request_delay = ms;
        }
        if self.images {
            config.output.download_images = true;
        }
        if self.no_images {
            config.output.download_images = false;
        }
        if let Some(dir) = &self.csv_dir {
            config.output.csv_dir = dir.clone();
        }
        if let Some(dir) = &self.images_dir {
            config.output.images_dir = dir.clone();
        }
        if self.abort_on_listing_error {
            config.crawler.on_listing_error = ListingFailurePolicy::Abort;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (cfg, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, Some(hash))
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            (Config::default(), None)
        }
    };

    cli.apply_overrides(&mut config);
    config::validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!(
        "  Max pages: {}",
        config
            .crawler
            .max_pages
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string())
    );
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!("  On listing error: {:?}", config.crawler.on_listing_error);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout);
    println!("  Connect timeout: {}s", config.http.connect_timeout);

    println!("\nOutput:");
    println!("  CSV directory: {}", config.output.csv_dir);
    if config.output.download_images {
        println!("  Images directory: {}", config.output.images_dir);
        println!("  Image log: {}", image_log_path(config).display());
    } else {
        println!("  Images: disabled");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation followed by the export
async fn handle_crawl(config: Config, config_hash: Option<String>) -> anyhow::Result<()> {
    let csv_dir = PathBuf::from(&config.output.csv_dir);
    let log_path = config.output.download_images.then(|| image_log_path(&config));
    let log_name = config.output.image_log.clone();
    let reserved: Vec<&str> = match log_path {
        Some(_) => vec![log_name.as_str()],
        None => Vec::new(),
    };

    let coordinator = Coordinator::new(config).context("Failed to set up crawler")?;
    let outcome = match coordinator.run().await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if outcome.is_empty() {
        tracing::warn!("No data collected, nothing to export");
    }

    let report = export_categories_reserving(&outcome.groups, &csv_dir, &reserved)
        .with_context(|| format!("Failed to export to {}", csv_dir.display()))?;

    if let Some(path) = &log_path {
        if let Err(e) = write_image_log(&outcome.image_log, path) {
            tracing::error!("Failed to write image log {}: {}", path.display(), e);
        }
    }

    let summary = RunSummary::new(&outcome, &report, config_hash);
    print_summary(&summary);

    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} category files could not be written",
            report.failures.len(),
            report.failures.len() + report.written.len()
        );
    }

    Ok(())
}

fn image_log_path(config: &Config) -> PathBuf {
    Path::new(&config.output.csv_dir).join(&config.output.image_log)
}
