//! Configuration for batch processing of report files.
//!
//! The section parser itself takes no configuration; these settings govern
//! which section is extracted, how output is written and how many files are
//! parsed at once.

use crate::constants::{DEFAULT_REPORT_CODE, MAX_CONCURRENT_FILES};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Output encodings for parsed rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One CSV record per row; record lengths vary by zone
    #[default]
    Csv,
    /// One JSON object per line, tagged with its zone
    Jsonl,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "jsonl" | "json" => Ok(OutputFormat::Jsonl),
            _ => Err(SimError::configuration(format!(
                "Unknown output format '{}'. Valid options: csv, jsonl",
                s
            ))),
        }
    }
}

/// Settings for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Report code of the section to extract
    pub report_code: String,

    /// Directory for output files; next to each input when unset
    pub output_dir: Option<PathBuf>,

    pub output_format: OutputFormat,

    /// Maximum number of files parsed concurrently
    pub max_concurrent_files: usize,

    /// Replace existing output files instead of skipping them
    pub overwrite: bool,

    /// Log and count per-file failures instead of aborting the run
    pub continue_on_error: bool,

    /// Show a progress bar
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            report_code: DEFAULT_REPORT_CODE.to_string(),
            output_dir: None,
            output_format: OutputFormat::default(),
            max_concurrent_files: num_cpus::get().clamp(1, MAX_CONCURRENT_FILES),
            overwrite: false,
            continue_on_error: true,
            show_progress: true,
        }
    }
}

impl ProcessorConfig {
    pub fn with_report_code(mut self, code: impl Into<String>) -> Self {
        self.report_code = code.into();
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    pub fn with_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn with_fail_fast(mut self) -> Self {
        self.continue_on_error = false;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Check settings before a run
    pub fn validate(&self) -> Result<()> {
        if self.report_code.trim().is_empty() {
            return Err(SimError::configuration("Report code must not be empty"));
        }

        if self.max_concurrent_files == 0 || self.max_concurrent_files > MAX_CONCURRENT_FILES {
            return Err(SimError::configuration(format!(
                "Concurrent files must be between 1 and {}",
                MAX_CONCURRENT_FILES
            )));
        }

        if let Some(dir) = &self.output_dir {
            if dir.is_file() {
                return Err(SimError::configuration(format!(
                    "Output path is a file, not a directory: {}",
                    dir.display()
                )));
            }
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessorConfig::default();
        assert_eq!(config.report_code, "BEPS");
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert!(config.continue_on_error);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ProcessorConfig::default()
            .with_report_code("beps")
            .with_output_format(OutputFormat::Jsonl)
            .with_max_concurrent_files(2)
            .with_overwrite()
            .with_fail_fast()
            .without_progress();

        assert_eq!(config.report_code, "beps");
        assert_eq!(config.output_format, OutputFormat::Jsonl);
        assert_eq!(config.max_concurrent_files, 2);
        assert!(config.overwrite);
        assert!(!config.continue_on_error);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(ProcessorConfig::default().with_report_code(" ").validate().is_err());
        assert!(
            ProcessorConfig::default()
                .with_max_concurrent_files(0)
                .validate()
                .is_err()
        );

        let file = NamedTempFile::new().unwrap();
        let config = ProcessorConfig::default().with_output_dir(file.path().to_path_buf());
        assert!(matches!(config.validate(), Err(SimError::Configuration { .. })));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert!("parquet".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Jsonl.to_string(), "jsonl");
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_value(ProcessorConfig::default()).unwrap();
        assert_eq!(json["report_code"], "BEPS");
        assert_eq!(json["output_format"], "csv");
    }
}
