//! Guidance Crawler main entry point
//!
//! This is the command-line interface for the guidance catalogue crawler.

use clap::Parser;
use guidance_crawler::config::{load_config_with_hash, Config, OutputFormat};
use guidance_crawler::output::{output_stem, write_outputs};
use guidance_crawler::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Guidance Crawler: a polite catalogue builder for published guidance
///
/// Walks the paginated guidance listing for each configured search,
/// extracts the chapters of every document, merges duplicates and writes
/// the catalogue to CSV and/or JSON.
#[derive(Parser, Debug)]
#[command(name = "guidance-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite catalogue builder for published guidance", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Override the configured output format
    #[arg(long, value_name = "csv|json|both")]
    format: Option<OutputFormat>,

    /// Only crawl listings; skip detail pages
    #[arg(long)]
    no_contents: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.no_contents {
        config.crawler.fetch_contents = false;
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("guidance_crawler=info,warn"),
            1 => EnvFilter::new("guidance_crawler=debug,info"),
            2 => EnvFilter::new("guidance_crawler=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Guidance Crawler Dry Run ===\n");

    let crawler = &config.crawler;
    println!("Crawler Configuration:");
    println!("  Base URL: {}", crawler.base_url);
    println!("  Max retries: {}", crawler.max_retries);
    println!(
        "  Concurrency: {} listing / {} detail pages",
        crawler.max_concurrent_list_pages, crawler.max_concurrent_detail_pages
    );
    println!(
        "  Delay between requests: {}-{}ms",
        crawler.min_delay_ms, crawler.max_delay_ms
    );
    println!("  Request timeout: {}s", crawler.request_timeout_secs);
    println!(
        "  Chapter retries: {} ({}ms backoff)",
        crawler.chapter_retries, crawler.chapter_backoff_ms
    );
    println!("  Fetch contents: {}", crawler.fetch_contents);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Format: {}", config.output.format);
    println!("  File stem: {}", output_stem(&config.search));
    if let Some(dir) = &config.output.contents_directory {
        println!("  Contents directory: {}", dir);
    }

    let base = Url::parse(&crawler.base_url)?;
    println!("\nSearches ({}):", config.search.len());
    for criteria in &config.search {
        println!("  - {}", criteria);
        println!("    {}", criteria.to_url(&base));
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} search set(s) from {}",
        config.search.len(),
        config.crawler.base_url
    );

    let outcome = match run_crawl(config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    for (criteria, error) in &outcome.failed {
        tracing::warn!("Search [{}] produced no records: {}", criteria, error);
    }

    if outcome.all_failed(config.search.len()) {
        return Err("every search set failed; nothing was crawled".into());
    }

    tracing::info!(
        "Merged {} record(s) into {}",
        outcome.raw_count,
        outcome.records.len()
    );

    let written = write_outputs(&config.output, &outcome.records, &config.search)?;
    for path in &written {
        println!("✓ Saved {}", path.display());
    }

    Ok(())
}
