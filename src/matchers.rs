//! Line matchers for the sub-tables of a BEPS section.
//!
//! Numeric zones use strict, anchored patterns: a line with an unknown label,
//! unit or field count is rejected rather than padded or truncated. The
//! percent/hours zone accepts any label and is strict only on
//! the trailing `= number`.
//!
//! Values are returned exactly as printed in the report. Nothing here parses
//! numbers.

use crate::chunk::pairs;
use crate::constants::{END_USE_CATEGORY_COUNT, TOTAL_ENERGY_LABELS};
use crate::models::{
    BepsRow, CategoryData, CategoryHeader, EnergyType, MeterIdentity, MeterRecord, NoteRow,
    PercentHoursRecord, TotalEnergyRecord,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// A line that failed its pattern, located by its offset within the zone slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMismatch {
    pub offset: usize,
    pub line: String,
    pub pattern: &'static str,
}

impl LineMismatch {
    pub fn new(line: &str, pattern: &'static str) -> Self {
        Self {
            offset: 0,
            line: line.to_string(),
            pattern,
        }
    }

    /// Place the mismatch at `offset` within its zone
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

pub type MatchResult<T> = std::result::Result<T, LineMismatch>;

pub const METER_IDENTITY: &str = "meter identity";
pub const CATEGORY_DATA: &str = "category data";
pub const TOTAL_ENERGY: &str = "total energy";
pub const PERCENT_HOURS: &str = "percent/hours";
pub const METER_PAIR: &str = "meter record pair";

static METER_IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let types = EnergyType::ALL
        .iter()
        .map(|t| regex::escape(t.as_str()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"^(?P<name>.+)\s{{2}}(?P<energy_type>{types})\s*$"))
        .expect("meter identity pattern is valid")
});

static CATEGORY_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    let values = r"\s+([\d.]+)".repeat(END_USE_CATEGORY_COUNT);
    Regex::new(&format!(r"^\s+(?P<unit>[A-Z]+){values}\s*$"))
        .expect("category data pattern is valid")
});

static TOTAL_ENERGY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let labels = TOTAL_ENERGY_LABELS.join("|");
    Regex::new(&format!(
        r"^\s+(?P<name>{labels})\s+(?P<value>\d+\.\d+)\s(?P<unit>MBTU)\s+(?P<gross>\d+\.\d+)\s+(?P<gross_unit>KBTU/SQFT-YR GROSS-AREA)\s+(?P<net>\d+\.\d+)\s+(?P<net_unit>KBTU/SQFT-YR NET-AREA)\s*$"
    ))
    .expect("total energy pattern is valid")
});

static PERCENT_HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(?P<label>.+?)\s+=\s+(?P<value>\d+(?:\.\d*)?)\s*$")
        .expect("percent/hours pattern is valid")
});

/// Match a meter identity line such as `EM1          ELECTRICITY`
pub fn match_meter_identity(line: &str) -> MatchResult<MeterIdentity> {
    let caps = METER_IDENTITY_RE
        .captures(line)
        .ok_or_else(|| LineMismatch::new(line, METER_IDENTITY))?;

    let energy_type = EnergyType::from_token(&caps["energy_type"])
        .ok_or_else(|| LineMismatch::new(line, METER_IDENTITY))?;

    Ok(MeterIdentity {
        name: caps["name"].trim_end().to_string(),
        energy_type,
    })
}

/// Match a data line: unit followed by exactly one value per end-use category
pub fn match_category_data(line: &str) -> MatchResult<CategoryData> {
    let caps = CATEGORY_DATA_RE
        .captures(line)
        .ok_or_else(|| LineMismatch::new(line, CATEGORY_DATA))?;

    // Group 1 is the unit; the values follow in column order
    let values = std::array::from_fn(|i| caps[i + 2].to_string());

    Ok(CategoryData {
        unit: caps["unit"].to_string(),
        values,
    })
}

pub fn match_total_energy(line: &str) -> MatchResult<TotalEnergyRecord> {
    let caps = TOTAL_ENERGY_RE
        .captures(line)
        .ok_or_else(|| LineMismatch::new(line, TOTAL_ENERGY))?;

    Ok(TotalEnergyRecord {
        name: caps["name"].to_string(),
        value: caps["value"].to_string(),
        unit: caps["unit"].to_string(),
        value_per_gross_area: caps["gross"].to_string(),
        unit_per_gross_area: caps["gross_unit"].to_string(),
        value_per_net_area: caps["net"].to_string(),
        unit_per_net_area: caps["net_unit"].to_string(),
    })
}

pub fn match_percent_hours(line: &str) -> MatchResult<PercentHoursRecord> {
    let caps = PERCENT_HOURS_RE
        .captures(line)
        .ok_or_else(|| LineMismatch::new(line, PERCENT_HOURS))?;

    Ok(PercentHoursRecord {
        label: caps["label"].to_string(),
        value: caps["value"].to_string(),
    })
}

/// The category zone always yields the fixed column labels
pub fn categories_zone(_lines: &[&str]) -> MatchResult<Vec<BepsRow>> {
    Ok(vec![BepsRow::Categories(CategoryHeader::default())])
}

/// Assemble meter records from alternating identity and data lines.
///
/// Blank lines are dropped first; an unpaired trailing line is an error.
pub fn content_zone(lines: &[&str]) -> MatchResult<Vec<BepsRow>> {
    let filled: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(offset, line)| (offset, *line))
        .collect();

    let records = pairs(&filled);
    if let Some(&(offset, line)) = records.remainder() {
        return Err(LineMismatch::new(line, METER_PAIR).at(offset));
    }

    let rows = records
        .map(|(&(id_offset, id_line), &(data_offset, data_line))| {
            let meter = match_meter_identity(id_line).map_err(|e| e.at(id_offset))?;
            let data = match_category_data(data_line).map_err(|e| e.at(data_offset))?;
            trace!(meter = %meter.name, energy_type = %meter.energy_type, "matched meter record");
            Ok(BepsRow::Meter(MeterRecord { meter, data }))
        })
        .collect::<MatchResult<Vec<_>>>()?;

    Ok(rows)
}

/// Summary lines carry data only, with no meter identity
pub fn summary_zone(lines: &[&str]) -> MatchResult<Vec<BepsRow>> {
    map_lines(lines, |line| match_category_data(line).map(BepsRow::Summary))
}

pub fn total_zone(lines: &[&str]) -> MatchResult<Vec<BepsRow>> {
    map_lines(lines, |line| match_total_energy(line).map(BepsRow::Total))
}

pub fn percent_zone(lines: &[&str]) -> MatchResult<Vec<BepsRow>> {
    map_lines(lines, |line| match_percent_hours(line).map(BepsRow::PercentHours))
}

/// The note zone yields its single line, trimmed
pub fn note_zone(lines: &[&str]) -> MatchResult<Vec<BepsRow>> {
    Ok(lines
        .iter()
        .take(1)
        .map(|line| {
            BepsRow::Note(NoteRow {
                text: line.trim().to_string(),
            })
        })
        .collect())
}

fn map_lines<F>(lines: &[&str], matcher: F) -> MatchResult<Vec<BepsRow>>
where
    F: Fn(&str) -> MatchResult<BepsRow>,
{
    lines
        .iter()
        .enumerate()
        .map(|(offset, line)| matcher(line).map_err(|e| e.at(offset)))
        .collect()
}
