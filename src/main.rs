//! # blogwatch
//!
//! Scans a list of blogs and reports the posts published today or yesterday.
//!
//! Blog listing pages differ wildly, so nothing here is site-specific by
//! default: article blocks, dates, titles and links are found with generic
//! heuristics, and a source may opt into a named date strategy when the
//! heuristics are not enough.
//!
//! ## Usage
//!
//! ```sh
//! blogwatch -s sources.yaml -f markdown -o ./reports
//! ```
//!
//! ## Architecture
//!
//! 1. **Registry**: load and validate `sources.yaml`
//! 2. **Window**: freeze today/yesterday once for the whole run
//! 3. **Scan**: fetch and extract every source, 5 at a time by default
//! 4. **Output**: print a summary, then optionally export it

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod fetch;
mod models;
mod orchestrator;
mod outputs;
mod recency;
mod utils;

use cli::Cli;
use extract::Extractor;
use extract::strategies::StrategyRegistry;
use fetch::HttpFetcher;
use itertools::Itertools;
use orchestrator::Orchestrator;
use outputs::display;
use recency::RecencyWindow;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("blogwatch starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Registry ----
    let sources = match config::load_registry(Path::new(&args.sources)) {
        Ok(sources) => sources,
        Err(e) => {
            error!(path = %args.sources, error = %e, "Could not load source registry");
            return Err(e.into());
        }
    };

    let strategies = Arc::new(StrategyRegistry::with_builtin());
    for source in &sources {
        if let Some(id) = source.date_strategy.as_deref() {
            if !strategies.contains(id) {
                warn!(
                    source = %source.name,
                    strategy = id,
                    known = %strategies.ids().join(", "),
                    "Unknown date strategy; the generic cascade will be used"
                );
            }
        }
    }

    // ---- Early check: the export dir must be writable before we spend time scanning ----
    if args.format.is_some() {
        if let Err(e) = ensure_writable_dir(&args.output_dir).await {
            error!(
                path = %args.output_dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Scan ----
    let window = RecencyWindow::today();
    debug!(start = %window.start(), end = %window.end(), basis = %window.basis(), "Recency window frozen");
    info!(
        sources = sources.len(),
        today = %window.today_date(),
        yesterday = %window.yesterday_date(),
        "Starting scan of {} blogs for posts on {} and {}",
        sources.len(),
        window.today_date(),
        window.yesterday_date()
    );

    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let orchestrator = Orchestrator::new(fetcher, Extractor::new(window, strategies), args.concurrency);

    let run = orchestrator
        .run(&sources, |p| match &p.error {
            None => info!(
                "Progress: [{}/{}] - {} - Found {} recent posts",
                p.completed, p.total, p.source, p.matches
            ),
            Some(e) => warn!(
                "Progress: [{}/{}] - Error processing {}: {}",
                p.completed, p.total, p.source, e
            ),
        })
        .await?;

    let articles = run.into_sorted();
    info!(count = articles.len(), "Collected recent posts");

    // ---- Output ----
    print!("{}", display::render(&articles, &window, !args.quiet));

    if let Some(format) = args.format {
        if articles.is_empty() {
            info!("No results to save");
        } else {
            match outputs::export(format, &articles, &window, Path::new(&args.output_dir)).await {
                Ok(path) => info!(path = %path.display(), "Results saved"),
                Err(e) => {
                    error!(error = %e, "Failed to save results");
                    return Err(e);
                }
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
