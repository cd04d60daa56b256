//! DOE-2 SIM Report Parser
//!
//! A Rust library for extracting the BEPS (Building Energy Performance)
//! table from DOE-2 simulation output reports.
//!
//! This library provides tools for:
//! - Splitting a `.SIM` report into its per-report pages
//! - Parsing a report section zone by zone against a fixed zone plan
//! - Typed rows for meters, end-use summaries, energy totals and notes
//! - Writing parsed rows as CSV or JSON lines
//! - Batch processing many reports concurrently

pub mod chunk;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod matchers;
pub mod models;
pub mod parser;
pub mod processor;
pub mod report;
pub mod zones;

// Re-export commonly used types
pub use config::{OutputFormat, ProcessorConfig};
pub use error::{Result, SimError};
pub use header::{Doe2HeaderParser, HeaderParser};
pub use models::{
    BepsRow, CategoryData, CategoryHeader, EnergyType, HeaderRow, MeterIdentity, MeterRecord,
    NoteRow, PercentHoursRecord, TotalEnergyRecord,
};
pub use parser::{SectionParser, parse_beps};
pub use report::{Section, SimReport};
pub use zones::{BEPS_PLAN, ZonePlan};
