//! Command-line interface definitions for blogwatch.
//!
//! Every option has a default, so a bare `blogwatch` scans the registry in
//! `./sources.yaml` and prints the results without exporting anything.

use crate::fetch::DEFAULT_TIMEOUT;
use crate::orchestrator::DEFAULT_CONCURRENCY;
use crate::outputs::ExportFormat;
use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Scan and print
/// blogwatch
///
/// # Scan a custom registry and save a Markdown report
/// blogwatch -s ./my_sources.yaml -f markdown -o ./reports
///
/// # Summary only, more parallel fetches
/// blogwatch -q -c 10
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML source registry
    #[arg(short, long, env = "BLOGWATCH_SOURCES", default_value = "sources.yaml")]
    pub sources: String,

    /// Save the results in this format (nothing is saved when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Directory the export file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Number of sources fetched at the same time
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Print the counts only, not every post
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["blogwatch"]);

        assert_eq!(cli.sources, "sources.yaml");
        assert_eq!(cli.format, None);
        assert_eq!(cli.output_dir, ".");
        assert_eq!(cli.concurrency, 5);
        assert_eq!(cli.timeout_secs, 30);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "blogwatch", "-s", "/tmp/blogs.yaml", "-f", "markdown", "-o", "/tmp/out", "-c", "8", "-q",
        ]);

        assert_eq!(cli.sources, "/tmp/blogs.yaml");
        assert_eq!(cli.format, Some(ExportFormat::Markdown));
        assert_eq!(cli.output_dir, "/tmp/out");
        assert_eq!(cli.concurrency, 8);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from(["blogwatch", "--format", "json", "--timeout-secs", "10"]);

        assert_eq!(cli.format, Some(ExportFormat::Json));
        assert_eq!(cli.timeout_secs, 10);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["blogwatch", "-f", "pdf"]).is_err());
    }
}
