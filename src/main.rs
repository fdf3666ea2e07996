//! Threadcast main entry point
//!
//! Command-line driver: loads the TOML configuration, crawls every
//! configured category concurrently, and writes one RSS feed per category
//! to the configured sink.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use reqwest::Client;
use std::path::PathBuf;
use threadcast::config::{load_config_with_hash, CategoryConfig, Config};
use threadcast::crawler::{build_http_client, crawl_category, listing_url};
use threadcast::feed::{build_feed, write_rss};
use threadcast::sink::{FeedSink, FileSink};
use threadcast::CrawlError;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Threadcast: forum thread listings as syndication feeds
#[derive(Parser, Debug)]
#[command(name = "threadcast")]
#[command(version = "1.0.0")]
#[command(about = "Crawl forum categories into RSS feeds", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the number of listing pages to crawl per category
    #[arg(long)]
    pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

/// Outcome of one category run, for end-of-run reporting
struct CategoryReport {
    entries: usize,
    skipped: usize,
    listing_failures: usize,
    destination: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if let Some(pages) = cli.pages {
        config.crawler.pages = pages.max(1);
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("threadcast=info,warn"),
            1 => EnvFilter::new("threadcast=debug,info"),
            2 => EnvFilter::new("threadcast=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config) {
    println!("=== Threadcast Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Name: {}", config.source.name);

    println!("\nCrawler:");
    println!("  Pages per category: {}", config.crawler.pages);
    println!("  Max concurrent requests: {}", config.crawler.max_concurrent);
    println!("  Retries: {}", config.crawler.retries);
    match config.crawler.timeout_secs {
        Some(secs) => println!("  Category deadline: {}s", secs),
        None => println!("  Category deadline: none"),
    }

    println!("\nOutput:");
    match &config.output.s3 {
        Some(s3) => println!("  S3 bucket: {} (prefix: {:?})", s3.bucket, s3.prefix),
        None => println!("  Directory: {}", config.output.directory),
    }

    println!("\nCategories ({}):", config.category.len());
    for category in &config.category {
        let pages = category.pages.unwrap_or(config.crawler.pages);
        println!("  - {} (id {}, {} pages)", category.name, category.id, pages);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl: all categories concurrently, one feed each
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    // base-url was validated at load time
    let base = Url::parse(&config.source.base_url)?;
    let client = build_http_client(&config.crawler)?;
    let sink = make_sink(&config).await?;

    let runs = config
        .category
        .iter()
        .map(|category| run_category(&client, &base, category, &config, sink.as_ref()));
    let outcomes = futures::future::join_all(runs).await;

    let mut failures = 0;
    for (category, outcome) in config.category.iter().zip(outcomes) {
        match outcome {
            Ok(report) => {
                tracing::info!(
                    "Category '{}': {} entries -> {} ({} threads skipped, {} listing pages failed)",
                    category.name,
                    report.entries,
                    report.destination,
                    report.skipped,
                    report.listing_failures
                );
            }
            Err(e) => {
                failures += 1;
                tracing::error!("Category '{}' failed: {}", category.name, e);
            }
        }
    }

    if failures == config.category.len() {
        anyhow::bail!("all {} categories failed", failures);
    }

    Ok(())
}

/// Runs one category end to end: crawl, build, serialize, write
async fn run_category(
    client: &Client,
    base: &Url,
    category: &CategoryConfig,
    config: &Config,
    sink: &dyn FeedSink,
) -> Result<CategoryReport, CrawlError> {
    let result = crawl_category(client, base, category, &config.crawler).await?;

    // An empty category is a valid outcome distinct from a failed crawl;
    // it still produces (and publishes) an empty feed.
    if result.threads.is_empty() {
        tracing::info!("Category '{}' has no threads", category.name);
    }

    let canonical = listing_url(base, &category.id, 1)?;
    let feed = build_feed(&result, canonical.as_str(), Utc::now());
    let xml = write_rss(&feed)?;
    let destination = sink.write(&category.name, &xml).await?;

    Ok(CategoryReport {
        entries: result.threads.len(),
        skipped: result.skipped.len(),
        listing_failures: result.listing_failures,
        destination,
    })
}

/// Chooses the output sink from configuration
async fn make_sink(config: &Config) -> anyhow::Result<Box<dyn FeedSink>> {
    if let Some(s3) = &config.output.s3 {
        #[cfg(feature = "s3")]
        {
            let sink = threadcast::sink::S3Sink::from_env(s3, &config.source.name).await;
            return Ok(Box::new(sink));
        }
        #[cfg(not(feature = "s3"))]
        {
            let _ = s3;
            anyhow::bail!(
                "configuration requests S3 output, but this binary was built without the `s3` feature"
            );
        }
    }

    Ok(Box::new(FileSink::new(&config.output.directory)))
}
