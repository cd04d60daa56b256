//! Error handling for DOE-2 report parsing.
//!
//! Provides error types with context for section parsing, report
//! splitting, file discovery and output writing failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A line did not have the fixed shape its zone expects
    #[error("Pattern mismatch in zone '{zone}' at line {line_number} ({pattern}): {line:?}")]
    PatternMismatch {
        zone: &'static str,
        /// 1-based line number within the section
        line_number: usize,
        line: String,
        pattern: &'static str,
    },

    #[error("Section too short: zone plan needs at least {required} lines, found {found}")]
    SectionTooShort { required: usize, found: usize },

    #[error("Report section '{code}' not found in {source_name}")]
    SectionNotFound { code: String, source_name: String },

    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output write failure not yet tied to a file
    #[error("Write error: {0}")]
    Write(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("No report files found for inputs: {inputs}")]
    NoInputFiles { inputs: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl SimError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Attach `path` to an unlocated write failure
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Write(source) => Self::io(path, source),
            other => other,
        }
    }

    /// True for failures caused by the report text rather than the environment
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::PatternMismatch { .. } | Self::SectionTooShort { .. } | Self::SectionNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
