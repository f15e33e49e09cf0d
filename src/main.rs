//! Sitepress main entry point
//!
//! This is the command-line interface for the Sitepress site crawler.

use anyhow::Context;
use clap::Parser;
use sitepress::config::{
    load_config_with_hash, require_root_url, ColorScheme, Config, Media, Overrides,
};
use sitepress::crawler::crawl;
use sitepress::output::{generate_markdown_report, print_report};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitepress: capture every page of a website
///
/// Sitepress starts at a root URL, follows same-origin links, and writes one
/// snapshot per page it reaches, never visiting a page twice and keeping a
/// bounded number of pages in flight.
#[derive(Parser, Debug)]
#[command(name = "sitepress")]
#[command(version)]
#[command(about = "Capture every page of a website", long_about = None)]
struct Cli {
    /// Root URL to crawl; overrides `root-url` from the config file
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages processed at once
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    jobs: Option<usize>,

    /// Skip URLs containing this substring (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "SUBSTR")]
    exclude: Vec<String>,

    /// Directory artifacts are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Crawl without writing any artifacts
    #[arg(long)]
    dry_run: bool,

    /// Keep artifacts that already exist instead of capturing again
    #[arg(long)]
    skip_existing: bool,

    /// Media type to emulate when capturing
    #[arg(long, value_enum)]
    media: Option<Media>,

    /// Preferred color scheme for captures
    #[arg(long, value_enum)]
    color_scheme: Option<ColorScheme>,

    /// Add a header and footer identifying each capture
    #[arg(long)]
    header_footer: bool,

    /// Seconds before a navigation counts as failed
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write a markdown crawl report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    show_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            root_url: self.url.clone(),
            max_concurrent_pages: self.jobs,
            exclude: self.exclude.clone(),
            dry_run: self.dry_run,
            skip_existing: self.skip_existing,
            verbose: self.verbose > 0,
            navigation_timeout: self.timeout,
            output_dir: self.output_dir.clone(),
            media: self.media,
            color_scheme: self.color_scheme,
            header_footer: self.header_footer,
            report_path: self.report.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            })?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    cli.overrides().apply(&mut config);

    // `verbose = true` in the file counts as a single -v
    let verbosity = if config.crawler.verbose {
        cli.verbose.max(1)
    } else {
        cli.verbose
    };
    setup_logging(verbosity, cli.quiet);

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    }

    require_root_url(&config).context("Invalid configuration")?;

    if cli.show_config {
        handle_show_config(&config);
        return Ok(());
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitepress=info,warn"),
            1 => EnvFilter::new("sitepress=debug,info"),
            2 => EnvFilter::new("sitepress=trace,debug"),
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

/// Handles --show-config: prints the configuration the crawl would use
fn handle_show_config(config: &Config) {
    println!("=== Sitepress Configuration ===\n");

    println!("Crawler:");
    println!(
        "  Root URL: {}",
        config.crawler.root_url.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages
    );
    println!(
        "  Navigation timeout: {}s",
        config.crawler.navigation_timeout
    );
    println!("  Dry run: {}", config.crawler.dry_run);
    println!("  Skip existing: {}", config.crawler.skip_existing);
    println!("  Exclusions ({}):", config.crawler.exclude.len());
    for exclusion in &config.crawler.exclude {
        println!("    - {}", exclusion);
    }

    println!("\nCapture:");
    println!("  Output directory: {}", config.capture.output_dir.display());
    println!("  Media: {}", config.capture.media);
    println!("  Color scheme: {}", config.capture.color_scheme);
    println!("  Header/footer: {}", config.capture.header_footer);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    if let Some(report_path) = &config.output.report_path {
        println!("\nReport: {}", report_path.display());
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> anyhow::Result<()> {
    let report_path = config.output.report_path.clone();

    let report = match crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context("Crawl did not complete");
        }
    };

    if !quiet {
        println!();
        print_report(&report);
    }

    if let Some(path) = report_path {
        generate_markdown_report(&report, &path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}
