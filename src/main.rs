//! Catalog-Walker main entry point
//!
//! This is the command-line interface for the Catalog-Walker course catalog
//! navigator.

use anyhow::Context;
use catalog_walker::config::{load_config_with_hash, parse_letters, validate, Config};
use catalog_walker::crawler::{run_catalog, PartitionKey};
use catalog_walker::output::print_summary;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Walker: a stateful course catalog navigator
///
/// Catalog-Walker replays the catalog's letter, department, course, term and
/// section pages one session per letter, and writes department, course and
/// section records as it goes.
#[derive(Parser, Debug)]
#[command(name = "catalog-walker")]
#[command(version = "1.0.0")]
#[command(about = "A stateful course catalog navigator", long_about = None)]
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

    /// Only walk these letters (overrides the config)
    #[arg(long, value_name = "LETTERS")]
    letters: Option<String>,

    /// Number of concurrent workers (overrides the config)
    #[arg(long, value_name = "N")]
    workers: Option<u32>,

    /// Validate config and show what would be walked without sending requests
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Command-line overrides, validated like the file itself
    if let Some(letters) = cli.letters {
        config.crawler.letters = Some(letters);
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    validate(&config).context("invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_walk(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "catalog_walker=info,warn",
            1 => "catalog_walker=debug,info",
            2 => "catalog_walker=trace,debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let partitions = match &config.crawler.letters {
        Some(letters) => parse_letters(letters)?,
        None => PartitionKey::alphabet(),
    };

    println!("=== Catalog-Walker Dry Run ===\n");

    println!("Target:");
    println!("  Endpoint: {}", config.target.endpoint);
    println!("  Action key: {}", config.target.action_key);
    println!("  Timeout: {}s", config.target.timeout_secs);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!(
        "  Backoff: {}ms to {}ms",
        config.retry.base_delay_ms, config.retry.max_delay_ms
    );

    println!("\nWalker:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!(
        "  Placeholder title: \"{}\"",
        config.crawler.placeholder_title
    );

    println!("\nSession:");
    match &config.session.cookie_file {
        Some(path) => println!("  Cookie file: {}", path),
        None => println!("  Inline cookies: {}", config.session.cookies.len()),
    }

    println!("\nOutput:");
    println!("  JSON tree: {}", config.output.directory);
    if let Some(db) = &config.output.database_path {
        println!("  Database: {}", db);
    }
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    let letters: String = partitions.iter().map(|k| k.letter()).collect();
    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would walk {} partitions ({}) on {} workers",
        partitions.len(),
        letters,
        (config.crawler.workers as usize).min(partitions.len())
    );

    Ok(())
}

/// Handles the main walk
async fn handle_walk(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Walking {} with {} workers",
        config.target.endpoint,
        config.crawler.workers
    );

    match run_catalog(config, config_hash).await {
        Ok(summary) => {
            print_summary(&summary);
            if summary.failed().is_empty() {
                tracing::info!("Catalog walk completed successfully");
            } else {
                tracing::warn!(
                    "Catalog walk completed with {} failed partitions",
                    summary.failed().len()
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Catalog walk failed: {}", e);
            Err(e.into())
        }
    }
}
