//! Archive-Sweep main entry point
//!
//! This is the command-line interface for the Archive-Sweep archive crawler.

use anyhow::{bail, Context};
use archive_sweep::config::{load_config_with_hash, Config};
use archive_sweep::crawler::Coordinator;
use archive_sweep::output::print_summary;
use archive_sweep::url::{archive_page_url, parse_archive_base};
use archive_sweep::CrawlWindow;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Exit status when `--strict` is set and the dataset may be incomplete
const PARTIAL_EXIT_CODE: u8 = 2;

/// Archive-Sweep: a date-bounded news archive crawler
///
/// Archive-Sweep walks the daily listing pages of a news archive, keeps the
/// U.S. Economy and U.S. Markets headlines, and writes them to one CSV file
/// per crawl window.
#[derive(Parser, Debug)]
#[command(name = "archive-sweep")]
#[command(version)]
#[command(about = "A date-bounded news archive crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// First date to crawl (YYYY-MM-DD), overrides [window] start-date
    #[arg(long, value_name = "DATE")]
    start_date: Option<NaiveDate>,

    /// Last date to crawl (YYYY-MM-DD), overrides [window] end-date
    #[arg(long, value_name = "DATE")]
    end_date: Option<NaiveDate>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Exit with status 2 if any page failed or the crawl stopped early
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let window = resolve_window(&config, cli.start_date, cli.end_date)?;

    if cli.dry_run {
        handle_dry_run(config, &window)?;
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(config, &window, cli.strict).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("archive_sweep=info,warn"),
            1 => EnvFilter::new("archive_sweep=debug,info"),
            2 => EnvFilter::new("archive_sweep=trace,debug"),
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

/// Combines command-line dates with the `[window]` section
fn resolve_window(
    config: &Config,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<CrawlWindow> {
    match CrawlWindow::resolve(config.window, start, end)? {
        Some(window) => Ok(window),
        None => bail!(
            "no crawl window: pass --start-date and --end-date or add a [window] section"
        ),
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: Config, window: &CrawlWindow) -> anyhow::Result<()> {
    let crawler = &config.crawler;

    println!("=== Archive-Sweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Archive: {}", crawler.archive_url);
    println!("  Max retries: {}", crawler.max_retries);
    println!("  Retry base delay: {}ms", crawler.retry_base_delay);
    println!("  Page delay: {}ms", crawler.page_delay);
    println!("  Request timeout: {}s", crawler.request_timeout);
    println!("  Date workers: {}", crawler.date_workers);
    match crawler.crawl_timeout {
        Some(secs) => println!("  Crawl deadline: {}s", secs),
        None => println!("  Crawl deadline: none"),
    }

    println!("\nSelectors:");
    println!("  Headline: {}", config.selectors.headline);
    println!("  Category: {}", config.selectors.category);
    println!("  Pagination: {}", config.selectors.pagination);

    println!("\nWindow: {} ({} days)", window, window.days());

    // Builds the client and compiles selectors without sending anything
    let coordinator = Coordinator::new(config)?;
    println!("Output: {}", coordinator.destination(window).display());

    println!("\n✓ Configuration is valid");
    let base = parse_archive_base(&coordinator.config().crawler.archive_url)?;
    println!(
        "✓ Would start crawling at {}",
        archive_page_url(&base, window.start(), 1)
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    window: &CrawlWindow,
    strict: bool,
) -> anyhow::Result<ExitCode> {
    let coordinator = Coordinator::new(config)?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received; saving collected articles");
            interrupt.cancel();
        }
    });

    let outcome = match coordinator.run_with_cancellation(window, cancel).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_summary(&outcome);

    if strict && outcome.report().is_partial() {
        return Ok(ExitCode::from(PARTIAL_EXIT_CODE));
    }
    Ok(ExitCode::SUCCESS)
}
