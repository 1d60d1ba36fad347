use anyhow::{Context, Result};
use appliance_scout::models::{Category, KnownCategory, ScrapeReport};
use appliance_scout::report::{self, Dashboard};
use appliance_scout::scrapers::{ExpatDakarScraper, HttpFetcher, ScrapeParams, ScraperTrait};
use appliance_scout::{CachedScraper, Config};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Scraper = CachedScraper<ExpatDakarScraper<HttpFetcher>>;

#[derive(Parser)]
#[command(author, version, about = "Scrape appliance listings from expat-dakar.com")]
struct Cli {
    /// Override EXPAT_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override SCOUT_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape categories and print them as tables
    Scrape {
        /// Category slug; repeat for several. Defaults to all known categories
        #[arg(short, long = "category")]
        categories: Vec<String>,

        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=100))]
        pages: u32,

        /// Also write CSV here (one file per category when several are scraped)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Truncate table cells to this many characters (0 = no limit)
        #[arg(long, default_value_t = 40)]
        max_width: usize,
    },
    /// Scrape one category and write it as CSV
    Export {
        #[arg(short, long)]
        category: String,

        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=100))]
        pages: u32,

        #[arg(short, long, default_value = "data.csv")]
        output: PathBuf,
    },
    /// Price ranking, address counts and condition breakdown
    Dashboard {
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=100))]
        pages: u32,

        /// Build the dashboard from an exported CSV instead of scraping
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// List the known categories
    Categories,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_scraper(config: &Config) -> Result<Scraper> {
    let fetcher = HttpFetcher::new(&config.user_agent, config.timeout)
        .context("Failed to create HTTP client")?;
    let scraper = ExpatDakarScraper::new(fetcher, &config.base_url)?
        .with_retry(config.retry_policy());
    Ok(CachedScraper::new(scraper, config.cache_ttl))
}

async fn scrape(scraper: &Scraper, category: Category, pages: u32) -> Result<Arc<ScrapeReport>> {
    let params = ScrapeParams::new(category, pages)?;
    scraper
        .scrape(&params)
        .await
        .with_context(|| format!("Failed to scrape {}", params.category))
}

fn parse_category(slug: &str) -> Result<Category> {
    Category::new(slug).with_context(|| format!("invalid category {slug:?}"))
}

fn print_report(report: &ScrapeReport, max_width: usize) {
    println!("## {}", report.category.label());
    println!("{}", report::summary(&report.records));
    if report.dropped_records > 0 || !report.skipped_pages.is_empty() {
        println!(
            "({} incomplete listings dropped, {} pages skipped)",
            report.dropped_records,
            report.skipped_pages.len()
        );
    }
    println!();
    print!("{}", report::render_table(&report.records, max_width));
    println!();
}

/// `data.csv` + `climatisation` -> `data-climatisation.csv`
fn per_category_path(base: &Path, category: &Category) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    base.with_file_name(format!("{stem}-{}.{ext}", category.slug()))
}

async fn run_scrape(
    scraper: &Scraper,
    slugs: Vec<String>,
    pages: u32,
    output: Option<PathBuf>,
    max_width: usize,
) -> Result<()> {
    let categories: Vec<Category> = if slugs.is_empty() {
        KnownCategory::ALL.into_iter().map(Category::from).collect()
    } else {
        slugs.iter().map(|s| parse_category(s)).collect::<Result<Vec<_>>>()?
    };
    let several = categories.len() > 1;

    for category in categories {
        let report = scrape(scraper, category, pages).await?;
        print_report(&report, max_width);

        if let Some(base) = &output {
            let path = if several {
                per_category_path(base, &report.category)
            } else {
                base.clone()
            };
            report::export_to_path(&path, &report.records)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }
    Ok(())
}

async fn run_dashboard(
    scraper: &Scraper,
    pages: u32,
    input: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let dashboards = match input {
        Some(path) => {
            let records = report::import_from_path(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            vec![Dashboard::build(path.display().to_string(), &records)]
        }
        None => {
            let mut dashboards = Vec::new();
            for known in [KnownCategory::Refrigerators, KnownCategory::WashingMachines] {
                let report = scrape(scraper, known.into(), pages).await?;
                dashboards.push(Dashboard::build(known.label(), &report.records));
            }
            dashboards
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboards)?);
    } else {
        for dashboard in &dashboards {
            println!("{dashboard}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    info!("🏠 Appliance Scout - expat-dakar scraper ({})", config.base_url);

    let scraper = build_scraper(&config)?;

    match cli.command {
        Command::Scrape {
            categories,
            pages,
            output,
            max_width,
        } => run_scrape(&scraper, categories, pages, output, max_width).await?,
        Command::Export {
            category,
            pages,
            output,
        } => {
            let report = scrape(&scraper, parse_category(&category)?, pages).await?;
            if report.records.is_empty() {
                warn!(category = %report.category, "No listings scraped; writing header only");
            }
            report::export_to_path(&output, &report.records)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        Command::Dashboard { pages, input, json } => {
            run_dashboard(&scraper, pages, input, json).await?
        }
        Command::Categories => {
            for known in KnownCategory::ALL {
                println!("{:<30} {}", known.slug(), known.label());
            }
        }
    }

    Ok(())
}
