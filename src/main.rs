use clap::{Parser, ValueEnum};
use golfshot_scraper::{
    Credentials, ErrorPolicy, ExportFormat, ExportSink, FileCache, HttpBrowser, Pipeline,
    ScraperConfig, ScraperError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

/// Scrape hole-by-hole round data from a Golfshot profile.
///
/// Credentials are read from GOLFSHOT_USERNAME / GOLFSHOT_PASSWORD (a `.env`
/// file in the working directory is loaded first).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Profile id from the rounds URL (/profiles/<id>/rounds); defaults to GOLFSHOT_PROFILE
    #[arg(short, long)]
    profile: Option<String>,

    /// Output file
    #[arg(short, long, default_value = "scraped_rounds.csv")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: Format,

    /// Stop at the first round that fails instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Maximum number of listing pages to follow
    #[arg(long, default_value_t = 50)]
    max_pages: usize,

    /// Disable the random pause between page loads
    #[arg(long)]
    no_delay: bool,

    /// Cache scorecard payloads in this directory across runs
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            if let ScraperError::Export(export) = &e {
                if let Some(fallback) = &export.fallback {
                    error!("{} rows were saved to {}", export.records.len(), fallback.display());
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, ScraperError> {
    let credentials = Credentials::from_env()?;
    let mut config = match args.profile {
        Some(profile) => ScraperConfig::new(profile),
        None => ScraperConfig::from_env()?,
    };
    config.max_pages = args.max_pages;
    if args.strict {
        config.error_policy = ErrorPolicy::AbortOnFirst;
    }
    if args.no_delay {
        config.delay.enabled = false;
    }
    config.cache_dir = args.cache_dir;

    let format = match args.format {
        Format::Csv => ExportFormat::Csv,
        Format::Json => ExportFormat::Json,
    };

    let mut pipeline = Pipeline::new(config.clone());
    if let Some(dir) = &config.cache_dir {
        pipeline.set_cache(Arc::new(FileCache::new(dir)));
    }

    let cancel = pipeline.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing the current round and exporting");
            cancel.cancel();
        }
    });

    let browser = HttpBrowser::new()?;
    let mut sink = ExportSink::new(&args.output, format);
    let report = pipeline.run(browser, &credentials, &mut sink).await?;

    info!(
        "Scraped {}/{} rounds, {} rows written to {}",
        report.rounds_ok,
        report.rounds_listed,
        report.artifact.rows,
        report.artifact.path.display()
    );
    for skipped in &report.skipped {
        warn!("Skipped round {} ({}): {}", skipped.round_id, skipped.url, skipped.reason);
    }

    if let Some(err) = report.aborted {
        error!("Run stopped early: {}", err);
        return Ok(ExitCode::FAILURE);
    }
    if report.cancelled {
        return Ok(ExitCode::from(130));
    }
    Ok(ExitCode::SUCCESS)
}
