//! Rival-Scope main entry point
//!
//! This is the command-line interface for collecting and scoring competitor
//! web content. Every command prints its result to stdout; nothing is
//! written to disk.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rival_scope::config::{load_config_or_default, Config};
use rival_scope::crawler::{CategorySelection, CrawlCoordinator, PageScraper};
use rival_scope::fetch::{ensure_scheme, HttpFetcher};
use rival_scope::output::format_crawl_summary;
use rival_scope::url::UrlCategory;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rival-Scope: competitor web content collection and scoring
///
/// Scrapes homepages, walks sitemaps into categorized feature pages, and
/// runs heuristic pricing and B2B SEO extraction.
#[derive(Parser, Debug)]
#[command(name = "rival-scope")]
#[command(version)]
#[command(about = "Competitor web content collection and scoring", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape one page into sanitized text
    Homepage {
        url: String,
    },

    /// Resolve a sitemap, filter and categorize its URLs, then scrape them
    Sitemap {
        url: String,

        /// Keep only URLs mentioning one of these keywords (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        keywords: Vec<String>,

        /// Scrape only these categories, in the given order
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<UrlCategory>,

        /// Print a markdown summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Extract prices, plans and availability signals from a page
    Pricing {
        url: String,
    },

    /// Extract meta tags and score a page for B2B SEO
    Seo {
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to build default configuration".to_string(),
    })?;

    let fetcher = HttpFetcher::new(&config.fetch).context("Failed to build HTTP client")?;

    match cli.command {
        Command::Homepage { url } => {
            let url = ensure_scheme(&url);
            let scraper = PageScraper::from_config(fetcher, &config);
            let page = scraper
                .scrape(&url)
                .await
                .with_context(|| format!("Failed to scrape {}", url))?;
            print_json(&page)?;
        }
        Command::Sitemap {
            url,
            keywords,
            categories,
            summary,
        } => {
            handle_sitemap(fetcher, &config, &url, keywords, categories, summary).await?;
        }
        Command::Pricing { url } => {
            let url = ensure_scheme(&url);
            let scraper = PageScraper::from_config(fetcher, &config);
            let page = scraper
                .scrape_pricing(&url)
                .await
                .with_context(|| format!("Failed to extract pricing from {}", url))?;
            print_json(&page)?;
        }
        Command::Seo { url } => {
            let url = ensure_scheme(&url);
            let scraper = PageScraper::from_config(fetcher, &config);
            let page = scraper
                .scrape_seo(&url)
                .await
                .with_context(|| format!("Failed to analyze SEO for {}", url))?;
            print_json(&page)?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rival_scope=info,warn"),
            1 => EnvFilter::new("rival_scope=debug,info"),
            2 => EnvFilter::new("rival_scope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the sitemap command: crawl, then print the report or its summary
async fn handle_sitemap(
    fetcher: HttpFetcher,
    config: &Config,
    url: &str,
    keywords: Vec<String>,
    categories: Vec<UrlCategory>,
    summary: bool,
) -> anyhow::Result<()> {
    let url = ensure_scheme(url);
    let keywords = if keywords.is_empty() {
        config.crawl.keywords.clone()
    } else {
        keywords
    };
    let selection = if categories.is_empty() {
        CategorySelection::All
    } else {
        CategorySelection::Categories(categories)
    };

    tracing::info!("Crawling sitemap {} with keywords {:?}", url, keywords);

    let coordinator = CrawlCoordinator::new(fetcher, config);
    let report = coordinator
        .run(&url, &keywords, &selection)
        .await
        .with_context(|| format!("Failed to crawl sitemap {}", url))?;

    if summary {
        println!("{}", format_crawl_summary(&report));
    } else {
        print_json(&report)?;
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
