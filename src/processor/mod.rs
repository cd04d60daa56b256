//! Batch processing of DOE-2 report files.
//!
//! Orchestrates the run: discover inputs, pull the configured section out of
//! each report, parse it and write the rows. Files are independent, so they
//! are parsed concurrently on the blocking pool with a bounded fan-out.

pub mod discovery;
pub mod writer;

#[cfg(test)]
mod tests;

use crate::config::ProcessorConfig;
use crate::constants::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use crate::error::{Result, SimError};
use crate::header::Doe2HeaderParser;
use crate::models::BepsRow;
use crate::parser::SectionParser;
use crate::report::SimReport;
use crate::zones::plan_for_report;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, error, info, warn};

pub use discovery::FileDiscovery;

/// Result of processing a single report file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written { output: PathBuf, rows: usize },
    /// Output already existed and overwrite was not requested
    Skipped { output: PathBuf },
}

/// Statistics for a batch run
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub rows_written: usize,
    pub processing_time: Duration,
    pub failures: Vec<(PathBuf, String)>,
}

impl ProcessingStats {
    fn record(&mut self, path: &Path, outcome: &Result<FileOutcome>) {
        match outcome {
            Ok(FileOutcome::Written { rows, .. }) => {
                self.files_processed += 1;
                self.rows_written += rows;
            }
            Ok(FileOutcome::Skipped { .. }) => self.files_skipped += 1,
            Err(e) => {
                self.files_failed += 1;
                self.failures.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    pub fn print_summary(&self) {
        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            self.processing_time.as_millis().to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files processed:".bright_cyan(),
            self.files_processed.to_string().bright_white()
        );
        if self.files_skipped > 0 {
            println!(
                "  {} {}",
                "Files skipped (output exists):".bright_yellow(),
                self.files_skipped.to_string().bright_yellow()
            );
        }
        if self.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                self.files_failed.to_string().bright_red().bold()
            );
            for (path, reason) in &self.failures {
                println!("    {} {}", path.display().to_string().bright_red(), reason);
            }
        }
        println!(
            "  {} {}",
            "Rows written:".bright_cyan(),
            self.rows_written.to_string().bright_white().bold()
        );
    }
}

/// Parses report files and writes their section rows
#[derive(Debug, Clone)]
pub struct ReportProcessor {
    config: ProcessorConfig,
    parser: SectionParser<Doe2HeaderParser>,
}

impl ReportProcessor {
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;

        let plan = plan_for_report(&config.report_code).ok_or_else(|| {
            SimError::configuration(format!(
                "No zone plan for report '{}'",
                config.report_code
            ))
        })?;

        Ok(Self {
            parser: SectionParser::new(plan, Doe2HeaderParser),
            config,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Read a report and parse its configured section
    pub fn parse_file(&self, path: &Path) -> Result<Vec<BepsRow>> {
        let report = SimReport::from_path(path)?;
        let section = report.section(&self.config.report_code)?;
        debug!(
            "Found {} section at line {} of {} ({} lines)",
            self.config.report_code,
            section.first_line,
            path.display(),
            section.len()
        );
        self.parser.parse(&section.lines)
    }

    /// Parse one report and write its rows next to it or into the output directory
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let output = writer::output_path_for(path, &self.config);
        if output.exists() && !self.config.overwrite {
            debug!("Skipping {}: {} exists", path.display(), output.display());
            return Ok(FileOutcome::Skipped { output });
        }

        let rows = self.parse_file(path)?;
        let rows = writer::write_rows_to_file(&rows, self.config.output_format, &output)?;
        Ok(FileOutcome::Written { output, rows })
    }

    /// Process many files concurrently.
    ///
    /// With `continue_on_error` unset the first failure is returned and the
    /// remaining files are abandoned.
    pub async fn process(&self, files: Vec<PathBuf>) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let mut stats = ProcessingStats::default();

        if files.is_empty() {
            return Ok(stats);
        }
        self.check_output_collisions(&files)?;

        let pb = self.progress_bar(files.len());
        let concurrent_limit = self.config.max_concurrent_files.min(files.len()).max(1);
        info!(
            "Processing {} files with up to {} concurrent",
            files.len(),
            concurrent_limit
        );

        let processor = Arc::new(self.clone());
        let mut results = stream::iter(files)
            .map(|path| {
                let processor = Arc::clone(&processor);
                async move {
                    let task_path = path.clone();
                    let outcome = task::spawn_blocking(move || processor.process_file(&task_path))
                        .await
                        .unwrap_or_else(|e| {
                            Err(SimError::ProcessingFailed {
                                path: path.clone(),
                                reason: format!("Task join error: {}", e),
                            })
                        });
                    (path, outcome)
                }
            })
            .buffer_unordered(concurrent_limit);

        while let Some((path, outcome)) = results.next().await {
            pb.inc(1);
            stats.record(&path, &outcome);

            if let Err(e) = outcome {
                if !self.config.continue_on_error {
                    error!("Aborting on {}: {}", path.display(), e);
                    pb.abandon_with_message("Aborted");
                    return Err(e);
                }
                if e.is_format_error() {
                    warn!("Skipping malformed report {}: {}", path.display(), e);
                } else {
                    error!("Failed to process {}: {}", path.display(), e);
                }
            }
        }

        pb.finish_with_message("Done");
        stats.processing_time = start_time.elapsed();
        info!(
            "Processed {} files ({} failed, {} skipped), {} rows",
            stats.files_processed, stats.files_failed, stats.files_skipped, stats.rows_written
        );

        Ok(stats)
    }

    /// Reject runs where two inputs would write the same output file
    fn check_output_collisions(&self, files: &[PathBuf]) -> Result<()> {
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(files.len());
        let mut collisions = Vec::new();

        for input in files {
            let output = writer::output_path_for(input, &self.config);
            if let Some(first) = claimed.get(&output) {
                collisions.push(format!(
                    "{} and {} -> {}",
                    first.display(),
                    input.display(),
                    output.display()
                ));
            } else {
                claimed.insert(output, input.as_path());
            }
        }

        if collisions.is_empty() {
            return Ok(());
        }
        Err(SimError::configuration(format!(
            "Inputs share an output file: {}",
            collisions.join("; ")
        )))
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(PROGRESS_CHARS),
        );
        pb.set_message("Parsing reports");
        pb
    }
}
