//! Command-line interface components.

use crate::config::{OutputFormat, ProcessorConfig};
use crate::constants::{DEFAULT_REPORT_CODE, MAX_CONCURRENT_FILES};
use crate::processor::{FileDiscovery, ProcessingStats, ReportProcessor};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "doe2-sim")]
#[command(about = "Extract BEPS energy-use tables from DOE-2 simulation reports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Report files, directories to search for .SIM files, or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Directory for output files (defaults to next to each input)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Report section to extract
    #[arg(short, long, default_value = DEFAULT_REPORT_CODE)]
    pub report: String,

    /// Output format (csv, jsonl)
    #[arg(short, long, default_value = "csv")]
    pub format: OutputFormat,

    /// Maximum number of files parsed concurrently (defaults to CPU count)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=MAX_CONCURRENT_FILES as i64))]
    pub jobs: Option<u16>,

    /// Replace existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Stop at the first file that fails to parse
    #[arg(long)]
    pub fail_fast: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only show errors; disables the progress bar and summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the processor configuration from the arguments
    pub fn to_config(&self) -> ProcessorConfig {
        let mut config = ProcessorConfig::default()
            .with_report_code(self.report.clone())
            .with_output_format(self.format);

        if let Some(dir) = &self.output {
            config = config.with_output_dir(dir.clone());
        }
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrent_files(usize::from(jobs));
        }
        if self.overwrite {
            config = config.with_overwrite();
        }
        if self.fail_fast {
            config = config.with_fail_fast();
        }
        if !self.show_progress() {
            config = config.without_progress();
        }
        config
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("doe2_sim_parser={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Discover inputs, process them and report the outcome
pub async fn run(args: Args) -> Result<ProcessingStats> {
    let config = args.to_config();
    let processor = ReportProcessor::new(config).context("Invalid configuration")?;

    let files = FileDiscovery::new(args.inputs.iter().cloned())
        .discover_report_files()
        .context("Failed to find report files")?;

    if !args.quiet {
        println!(
            "{} {} report files, extracting {}",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold(),
            processor.config().report_code.bright_cyan()
        );
    }

    let stats = processor
        .process(files)
        .await
        .context("Processing aborted")?;

    if !args.quiet {
        stats.print_summary();
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("doe2-sim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["run.SIM"]);
        assert_eq!(args.inputs, vec!["run.SIM"]);
        assert_eq!(args.report, "BEPS");
        assert_eq!(args.format, OutputFormat::Csv);
        assert!(args.jobs.is_none());

        let config = args.to_config();
        assert!(config.continue_on_error);
        assert!(config.show_progress);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_options_map_to_config() {
        let args = parse(&[
            "a.SIM", "runs/", "-o", "out", "-f", "jsonl", "-j", "3", "--overwrite", "--fail-fast",
        ]);
        let config = args.to_config();

        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.output_format, OutputFormat::Jsonl);
        assert_eq!(config.max_concurrent_files, 3);
        assert!(config.overwrite);
        assert!(!config.continue_on_error);
    }

    #[test]
    fn test_inputs_required() {
        assert!(Args::try_parse_from(["doe2-sim"]).is_err());
    }

    #[test]
    fn test_jobs_range() {
        assert!(Args::try_parse_from(["doe2-sim", "a.SIM", "-j", "0"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = parse(&["run.SIM"]);
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
        assert!(!args.to_config().show_progress);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["doe2-sim", "a.SIM", "-v", "-q"]).is_err());
    }
}
