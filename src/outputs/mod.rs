//! Terminal display and file export of a run's results.
//!
//! # Submodules
//!
//! - [`display`]: summary and numbered listing printed to stdout
//! - [`csv`]: `Blog,Title,Date,URL` table
//! - [`html`]: the same table as an HTML document
//! - [`markdown`]: report grouped by date, then blog
//! - [`json`]: array of articles for other tools
//!
//! Every export writes one file into the output directory:
//!
//! ```text
//! output_dir/
//! └── recent_posts_2025-04-21_and_2025-04-20_20250421_081500.csv
//! ```

pub mod csv;
pub mod display;
pub mod html;
pub mod json;
pub mod markdown;

use crate::models::ExtractedArticle;
use crate::recency::RecencyWindow;
use chrono::{Local, NaiveDateTime};
use clap::ValueEnum;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// File format for `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Html,
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

/// `recent_posts_<today>_and_<yesterday>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn export_filename(format: ExportFormat, window: &RecencyWindow, now: NaiveDateTime) -> String {
    format!(
        "recent_posts_{}_and_{}_{}.{}",
        window.today_date().format("%Y-%m-%d"),
        window.yesterday_date().format("%Y-%m-%d"),
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Render `articles` in `format` and write them to a new file under
/// `output_dir`.
///
/// # Arguments
///
/// * `format` - Export format, which also picks the file extension
/// * `articles` - Results in display order (see [`RunResult::into_sorted`](crate::models::RunResult::into_sorted))
/// * `window` - The run's window, used in the filename and report headers
/// * `output_dir` - Existing directory to write into
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns an error if rendering fails or the file cannot be written.
#[instrument(level = "info", skip_all, fields(format = ?format, output_dir = %output_dir.display()))]
pub async fn export(
    format: ExportFormat,
    articles: &[ExtractedArticle],
    window: &RecencyWindow,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let now = Local::now().naive_local();
    let path = output_dir.join(export_filename(format, window, now));

    let content = match format {
        ExportFormat::Csv => csv::render(articles)?,
        ExportFormat::Html => html::render(articles, window),
        ExportFormat::Markdown => markdown::render(articles, window, now),
        ExportFormat::Json => json::render(articles)?,
    };

    info!(path = %path.display(), count = articles.len(), "Writing export");
    fs::write(&path, content).await?;
    info!(path = %path.display(), "Wrote export");
    Ok(path)
}

/// Value shown in the `Date` column.
pub(crate) fn date_cell(article: &ExtractedArticle) -> String {
    article.published_date().format("%Y-%m-%d").to_string()
}
