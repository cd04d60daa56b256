//! Application constants for the DOE-2 SIM parser
//!
//! This module contains the fixed report vocabulary, default values and
//! file conventions used throughout the parser.

// =============================================================================
// Report Sections
// =============================================================================

/// Report code of the Building Energy Performance Summary
pub const BEPS_REPORT_CODE: &str = "BEPS";

/// Report extracted when none is specified
pub const DEFAULT_REPORT_CODE: &str = BEPS_REPORT_CODE;

/// Number of lines at the top of a page handed to the header parser
pub const HEADER_LINE_COUNT: usize = 3;

/// Form feed emitted by DOE-2 at the start of each printed page
pub const FORM_FEED: char = '\u{c}';

// =============================================================================
// BEPS Categories
// =============================================================================

/// Number of end-use categories in a BEPS data line (including TOTAL)
pub const END_USE_CATEGORY_COUNT: usize = 13;

/// End-use category labels in the column order of the report
pub const END_USE_CATEGORIES: [&str; END_USE_CATEGORY_COUNT] = [
    "LIGHTS",
    "TASK LIGHTS",
    "MISC EQUIP",
    "SPACE HEATING",
    "SPACE COOLING",
    "HEAT REJECT",
    "PUMPS & AUX",
    "VENT FANS",
    "REFRIG DISPLAY",
    "HT PUMP SUPPLEM",
    "DOMEST HOT WTR",
    "EXT USAGE",
    "TOTAL",
];

/// Leading identity columns of every meter row
pub const METER_COLUMNS: [&str; 3] = ["METER", "TYPE", "UNIT"];

/// Field count of a complete meter row (identity + unit + end uses)
pub const METER_ROW_ARITY: usize = METER_COLUMNS.len() + END_USE_CATEGORY_COUNT;

/// Labels accepted on the total-energy lines
pub const TOTAL_ENERGY_LABELS: [&str; 2] = ["TOTAL SITE ENERGY", "TOTAL SOURCE ENERGY"];

// =============================================================================
// Input Files
// =============================================================================

/// Extension of DOE-2 simulation output files (matched case-insensitively)
pub const SIM_FILE_EXTENSION: &str = "sim";

// =============================================================================
// Processing Configuration Defaults
// =============================================================================

/// Upper bound on files parsed at once, whatever the CPU count
pub const MAX_CONCURRENT_FILES: usize = 64;

/// Progress bar template for batch processing
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta}) {msg}";

/// Progress bar characters
pub const PROGRESS_CHARS: &str = "#>-";
