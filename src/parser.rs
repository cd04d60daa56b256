//! Section parser: runs a zone plan over the lines of one report section.
//!
//! Zones are processed strictly in plan order and their rows concatenated.
//! The first matcher failure aborts the parse; no partial rows are returned.

use crate::error::{Result, SimError};
use crate::header::{Doe2HeaderParser, HeaderParser};
use crate::matchers::LineMismatch;
use crate::models::BepsRow;
use crate::zones::{BEPS_PLAN, Zone, ZoneMatcher, ZonePlan};
use tracing::debug;

/// Parses isolated report sections according to a [`ZonePlan`]
#[derive(Debug, Clone)]
pub struct SectionParser<H = Doe2HeaderParser> {
    plan: &'static ZonePlan,
    header_parser: H,
}

impl SectionParser {
    /// Parser for BEPS sections with the standard DOE-2 header
    pub fn beps() -> Self {
        Self {
            plan: &BEPS_PLAN,
            header_parser: Doe2HeaderParser,
        }
    }
}

impl Default for SectionParser {
    fn default() -> Self {
        Self::beps()
    }
}

impl<H: HeaderParser> SectionParser<H> {
    pub fn new(plan: &'static ZonePlan, header_parser: H) -> Self {
        Self {
            plan,
            header_parser,
        }
    }

    /// Swap in a different header parser, keeping the plan
    pub fn with_header_parser<P: HeaderParser>(self, header_parser: P) -> SectionParser<P> {
        SectionParser {
            plan: self.plan,
            header_parser,
        }
    }

    pub fn plan(&self) -> &'static ZonePlan {
        self.plan
    }

    /// Parse one section into its rows, header first and note last
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<BepsRow>> {
        let required = self.plan.min_lines();
        if lines.len() < required {
            return Err(SimError::SectionTooShort {
                required,
                found: lines.len(),
            });
        }

        let mut rows = Vec::new();
        for zone in self.plan.zones {
            let zone_rows = self.parse_zone(zone, lines)?;
            debug!("Zone '{}' produced {} rows", zone.name, zone_rows.len());
            rows.extend(zone_rows);
        }

        debug!(
            "Parsed {} section: {} lines, {} rows",
            self.plan.report_code,
            lines.len(),
            rows.len()
        );
        Ok(rows)
    }

    fn parse_zone<S: AsRef<str>>(&self, zone: &Zone, lines: &[S]) -> Result<Vec<BepsRow>> {
        let (start, zone_lines) = zone.slice(lines);

        let matched = match zone.matcher {
            ZoneMatcher::Header => self
                .header_parser
                .parse_header(&zone_lines)
                .map(|rows| rows.into_iter().map(BepsRow::Header).collect()),
            ZoneMatcher::Lines(matcher) => matcher(&zone_lines),
        };

        matched.map_err(|mismatch| pattern_mismatch(zone, start, mismatch))
    }
}

fn pattern_mismatch(zone: &Zone, start: usize, mismatch: LineMismatch) -> SimError {
    SimError::PatternMismatch {
        zone: zone.name,
        line_number: start + mismatch.offset + 1,
        line: mismatch.line,
        pattern: mismatch.pattern,
    }
}

/// Parse a BEPS section with the default parser
pub fn parse_beps<S: AsRef<str>>(lines: &[S]) -> Result<Vec<BepsRow>> {
    SectionParser::beps().parse(lines)
}
