//! Zone plans: the fixed layout of a report section.
//!
//! A plan is an ordered list of zones. Each zone names a half-open line range
//! of the section (negative offsets count back from the end) and the matcher
//! that turns those lines into rows.

use crate::matchers::{self, MatchResult};
use crate::models::BepsRow;
use std::ops::Range;

/// Signature shared by all line-based zone matchers
pub type ZoneMatchFn = fn(&[&str]) -> MatchResult<Vec<BepsRow>>;

/// What a zone hands its lines to
#[derive(Debug, Clone, Copy)]
pub enum ZoneMatcher {
    /// The section header, delegated to the parser's [`crate::header::HeaderParser`]
    Header,
    Lines(ZoneMatchFn),
}

/// Half-open line range with Python-style negative offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: isize,
    pub end: isize,
}

impl LineRange {
    pub const fn new(start: isize, end: isize) -> Self {
        Self { start, end }
    }

    /// Resolve against a sequence of `len` lines, clamping to its bounds
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let start = resolve_offset(self.start, len);
        let end = resolve_offset(self.end, len);
        start..end.max(start)
    }

    /// Fewest lines a section needs for this range to be fully in bounds
    /// and not to run backwards
    pub fn min_len(&self) -> usize {
        match (self.start >= 0, self.end >= 0) {
            (true, true) => self.end.max(self.start).unsigned_abs(),
            (false, false) => self.start.unsigned_abs(),
            (true, false) => self.start.unsigned_abs() + self.end.unsigned_abs(),
            // A positive end after a negative start only holds for short sections
            (false, true) => self.start.unsigned_abs(),
        }
    }
}

fn resolve_offset(offset: isize, len: usize) -> usize {
    if offset >= 0 {
        offset.unsigned_abs().min(len)
    } else {
        len.saturating_sub(offset.unsigned_abs())
    }
}

/// A named line range and the matcher applied to it
#[derive(Debug, Clone, Copy)]
pub struct Zone {
    pub name: &'static str,
    pub range: LineRange,
    pub matcher: ZoneMatcher,
}

impl Zone {
    pub const fn new(name: &'static str, range: LineRange, matcher: ZoneMatcher) -> Self {
        Self {
            name,
            range,
            matcher,
        }
    }

    /// The lines of `section` that belong to this zone
    pub fn slice<'a, S: AsRef<str>>(&self, section: &'a [S]) -> (usize, Vec<&'a str>) {
        let range = self.range.resolve(section.len());
        let start = range.start;
        (start, section[range].iter().map(|line| line.as_ref()).collect())
    }
}

/// Ordered zones making up one kind of report section
#[derive(Debug, Clone, Copy)]
pub struct ZonePlan {
    pub report_code: &'static str,
    pub zones: &'static [Zone],
}

impl ZonePlan {
    /// Fewest lines a section must have for every zone to resolve in place
    pub fn min_lines(&self) -> usize {
        self.zones
            .iter()
            .map(|zone| zone.range.min_len())
            .max()
            .unwrap_or(0)
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.zones.iter().map(|zone| zone.name)
    }
}

pub const HEADER: &str = "header";
pub const CATEGORIES: &str = "categories";
pub const CONTENT: &str = "content";
pub const SUMMARY: &str = "summary";
pub const TOTAL: &str = "total";
pub const PERCENT: &str = "percent";
pub const NOTE: &str = "note";

static BEPS_ZONES: [Zone; 7] = [
    Zone::new(HEADER, LineRange::new(0, 3), ZoneMatcher::Header),
    Zone::new(
        CATEGORIES,
        LineRange::new(5, 7),
        ZoneMatcher::Lines(matchers::categories_zone),
    ),
    Zone::new(
        CONTENT,
        LineRange::new(9, -17),
        ZoneMatcher::Lines(matchers::content_zone),
    ),
    Zone::new(
        SUMMARY,
        LineRange::new(-15, -14),
        ZoneMatcher::Lines(matchers::summary_zone),
    ),
    Zone::new(
        TOTAL,
        LineRange::new(-11, -9),
        ZoneMatcher::Lines(matchers::total_zone),
    ),
    Zone::new(
        PERCENT,
        LineRange::new(-8, -4),
        ZoneMatcher::Lines(matchers::percent_zone),
    ),
    Zone::new(
        NOTE,
        LineRange::new(-3, -2),
        ZoneMatcher::Lines(matchers::note_zone),
    ),
];

/// Layout of the BEPS (Building Energy Performance Summary) page
pub static BEPS_PLAN: ZonePlan = ZonePlan {
    report_code: crate::constants::BEPS_REPORT_CODE,
    zones: &BEPS_ZONES,
};

/// Plans for every report the parser understands
pub static PLANS: [&ZonePlan; 1] = [&BEPS_PLAN];

/// Zone plan for a report code (case-insensitive)
pub fn plan_for_report(code: &str) -> Option<&'static ZonePlan> {
    PLANS
        .iter()
        .copied()
        .find(|plan| plan.report_code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_positive_range() {
        assert_eq!(LineRange::new(0, 3).resolve(30), 0..3);
        assert_eq!(LineRange::new(5, 7).resolve(6), 5..6);
        assert_eq!(LineRange::new(5, 7).resolve(2), 2..2);
    }

    #[test]
    fn test_resolve_negative_range() {
        assert_eq!(LineRange::new(-15, -14).resolve(30), 15..16);
        assert_eq!(LineRange::new(9, -17).resolve(30), 9..13);
        assert_eq!(LineRange::new(-3, -2).resolve(2), 0..0);
    }

    #[test]
    fn test_resolve_never_runs_backwards() {
        assert_eq!(LineRange::new(9, -17).resolve(20), 9..9);
    }

    #[test]
    fn test_min_len() {
        assert_eq!(LineRange::new(0, 3).min_len(), 3);
        assert_eq!(LineRange::new(9, -17).min_len(), 26);
        assert_eq!(LineRange::new(-8, -4).min_len(), 8);
    }

    #[test]
    fn test_beps_plan_order() {
        let names: Vec<_> = BEPS_PLAN.names().collect();
        assert_eq!(
            names,
            vec![HEADER, CATEGORIES, CONTENT, SUMMARY, TOTAL, PERCENT, NOTE]
        );
        assert_eq!(BEPS_PLAN.min_lines(), 26);
        assert_eq!(BEPS_PLAN.report_code, "BEPS");
    }

    #[test]
    fn test_plan_for_report() {
        assert!(plan_for_report("beps").is_some());
        assert!(plan_for_report("PS-E").is_none());
    }

    #[test]
    fn test_zone_slice() {
        let section: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();
        let zone = BEPS_PLAN.zone(TOTAL).unwrap();
        let (start, lines) = zone.slice(&section);
        assert_eq!(start, 19);
        assert_eq!(lines, vec!["line 19", "line 20"]);
    }
}
