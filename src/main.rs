//! Sitepulse main entry point
//!
//! This is the command-line interface for the Sitepulse crawl server.

use clap::Parser;
use sitepulse::config::Config;
use sitepulse::crawler::CrawlEngine;
use sitepulse::server::start_server;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Sitepulse: live crawl metrics over WebSocket
///
/// Sitepulse crawls a website from a seed URL and streams cumulative
/// load metrics to every viewer subscribed to that site's channel.
/// Crawls start when a channel gains its first viewer and stop when the
/// last one leaves.
#[derive(Parser, Debug)]
#[command(name = "sitepulse")]
#[command(version = "1.0.0")]
#[command(about = "Live crawl metrics over WebSocket", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "crawl")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl a single seed URL, print events as JSON lines, and exit
    #[arg(long, value_name = "URL", conflicts_with = "dry_run")]
    crawl: Option<String>,

    /// Validate config and show the channel table without serving
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // One-shot mode needs no configuration file
    if let Some(seed_url) = cli.crawl.as_deref() {
        return handle_crawl_once(seed_url).await;
    }

    let Some(config_path) = cli.config else {
        anyhow::bail!("CONFIG is required unless --crawl is given");
    };

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", config_path.display());
    let config = match sitepulse::config::load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_serve(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitepulse=info,warn"),
            1 => EnvFilter::new("sitepulse=debug,info"),
            2 => EnvFilter::new("sitepulse=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the channel table
fn handle_dry_run(config: &Config) {
    println!("=== Sitepulse Dry Run ===\n");

    println!("Server:");
    println!("  Bind address: {}", config.server.bind_address);
    println!("  Port: {}", config.server.port);

    println!("\nChannels ({}):", config.channels.len());
    for channel in &config.channels {
        println!("  - /ws/{} -> {}", channel.name, channel.seed_url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --crawl mode: one crawl run, events as JSON lines on stdout
async fn handle_crawl_once(seed_url: &str) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine = CrawlEngine::new(seed_url, tx)?;

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!("Failed to encode event: {}", e),
            }
        }
    });

    engine.run().await;

    // The engine dropped its sender, so the printer drains and exits
    printer.await?;

    Ok(())
}

/// Handles the main serve operation
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Serving {} channels on {}:{}",
        config.channels.len(),
        config.server.bind_address,
        config.server.port
    );

    match start_server(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Server failed: {}", e);
            Err(e.into())
        }
    }
}
