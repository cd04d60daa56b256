//! Page header parsing for DOE-2 reports.
//!
//! Every printed page of a `.SIM` file starts with a run banner and a report
//! title line:
//!
//! ```text
//! 1OFFICE BUILDING                          DOE-2.2-48r   6/13/2019    10:43:52  BDL RUN  1
//!
//! REPORT- BEPS Building Energy Performance               WEATHER FILE- TMY2 SAN_DIEGO
//! ```
//!
//! The section parser treats the header as a black box behind [`HeaderParser`];
//! [`Doe2HeaderParser`] is the implementation used by default.

use crate::constants::FORM_FEED;
use crate::matchers::{LineMismatch, MatchResult};
use crate::models::HeaderRow;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

pub const RUN_BANNER: &str = "run banner";
pub const REPORT_TITLE: &str = "report title";

/// Offset of the report title line within the header lines
const TITLE_LINE: usize = 2;

// The leading `1` is the carriage-control character of a new page
static BANNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\x0c?1?(?P<project>.*?)\s+(?P<program>DOE-\S+)\s+(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<time>\d{1,2}:\d{2}:\d{2})\s+BDL RUN\s+(?P<run>\d+)\s*$",
    )
    .expect("run banner pattern is valid")
});

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*REPORT-\s*(?P<code>\S+)\s*(?P<title>.*?)(?:\s{2,}WEATHER FILE-\s*(?P<weather>.*?))?\s*$",
    )
    .expect("report title pattern is valid")
});

/// Turns the first lines of a section into metadata rows
pub trait HeaderParser: Send + Sync {
    fn parse_header(&self, lines: &[&str]) -> MatchResult<Vec<HeaderRow>>;
}

/// Run identification from the first line of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunBanner {
    pub project: String,
    pub program: String,
    pub run_date: String,
    pub run_time: String,
    pub run_number: String,
}

impl RunBanner {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = BANNER_RE.captures(line)?;
        Some(Self {
            project: caps["project"].trim().to_string(),
            program: caps["program"].to_string(),
            run_date: caps["date"].to_string(),
            run_time: caps["time"].to_string(),
            run_number: caps["run"].to_string(),
        })
    }

    fn into_row(self) -> HeaderRow {
        HeaderRow::new([
            self.project,
            self.program,
            self.run_date,
            self.run_time,
            self.run_number,
        ])
    }
}

/// Report code, title and weather file from the `REPORT-` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTitle {
    pub code: String,
    pub title: String,
    pub weather_file: Option<String>,
}

impl ReportTitle {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = TITLE_RE.captures(line)?;
        Some(Self {
            code: caps["code"].to_string(),
            title: caps["title"].trim().to_string(),
            weather_file: caps
                .name("weather")
                .map(|m| m.as_str().trim().to_string())
                .filter(|w| !w.is_empty()),
        })
    }

    fn into_row(self) -> HeaderRow {
        HeaderRow::new([self.code, self.title, self.weather_file.unwrap_or_default()])
    }
}

/// True when `line` opens a new printed page
pub fn is_page_banner(line: &str) -> bool {
    BANNER_RE.is_match(line)
}

/// Report code of a `REPORT-` title line, e.g. `BEPS`
pub fn report_code(line: &str) -> Option<String> {
    ReportTitle::parse(line).map(|title| title.code)
}

/// Header parser for the standard DOE-2.2 page layout
#[derive(Debug, Clone, Copy, Default)]
pub struct Doe2HeaderParser;

impl HeaderParser for Doe2HeaderParser {
    fn parse_header(&self, lines: &[&str]) -> MatchResult<Vec<HeaderRow>> {
        let banner_line = lines.first().copied().unwrap_or_default();
        let banner = RunBanner::parse(banner_line)
            .ok_or_else(|| LineMismatch::new(banner_line, RUN_BANNER))?;

        let title_line = lines.get(TITLE_LINE).copied().unwrap_or_default();
        let title = ReportTitle::parse(title_line)
            .ok_or_else(|| LineMismatch::new(title_line, REPORT_TITLE).at(TITLE_LINE))?;

        debug!(
            "Parsed header: project={:?} report={} run={}",
            banner.project, title.code, banner.run_number
        );

        Ok(vec![banner.into_row(), title.into_row()])
    }
}

/// Strip the form feed DOE-2 prints ahead of a page banner
pub fn strip_form_feed(line: &str) -> &str {
    line.trim_start_matches(FORM_FEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNER: &str = "1OFFICE BUILDING                                                   DOE-2.2-48r   6/13/2019    10:43:52  BDL RUN  1";
    const TITLE: &str = "REPORT- BEPS Building Energy Performance                                          WEATHER FILE- TMY2 SAN_DIEGO";

    #[test]
    fn test_parse_run_banner() {
        let banner = RunBanner::parse(BANNER).unwrap();
        assert_eq!(banner.project, "OFFICE BUILDING");
        assert_eq!(banner.program, "DOE-2.2-48r");
        assert_eq!(banner.run_date, "6/13/2019");
        assert_eq!(banner.run_time, "10:43:52");
        assert_eq!(banner.run_number, "1");
    }

    #[test]
    fn test_banner_with_form_feed() {
        let line = format!("{FORM_FEED}{BANNER}");
        assert!(is_page_banner(&line));
        assert_eq!(RunBanner::parse(&line).unwrap().project, "OFFICE BUILDING");
        assert_eq!(strip_form_feed(&line), BANNER);
    }

    #[test]
    fn test_not_a_banner() {
        assert!(!is_page_banner("  EM1          ELECTRICITY"));
        assert!(!is_page_banner(""));
    }

    #[test]
    fn test_parse_report_title() {
        let title = ReportTitle::parse(TITLE).unwrap();
        assert_eq!(title.code, "BEPS");
        assert_eq!(title.title, "Building Energy Performance");
        assert_eq!(title.weather_file.as_deref(), Some("TMY2 SAN_DIEGO"));
        assert_eq!(report_code(TITLE).as_deref(), Some("BEPS"));
    }

    #[test]
    fn test_report_title_without_weather_file() {
        let title = ReportTitle::parse("REPORT- PS-E Energy End-Use Summary for all Electric Meters").unwrap();
        assert_eq!(title.code, "PS-E");
        assert_eq!(title.title, "Energy End-Use Summary for all Electric Meters");
        assert_eq!(title.weather_file, None);
    }

    #[test]
    fn test_header_rows() {
        let rows = Doe2HeaderParser.parse_header(&[BANNER, "", TITLE]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].fields,
            vec!["OFFICE BUILDING", "DOE-2.2-48r", "6/13/2019", "10:43:52", "1"]
        );
        assert_eq!(
            rows[1].fields,
            vec!["BEPS", "Building Energy Performance", "TMY2 SAN_DIEGO"]
        );
    }

    #[test]
    fn test_header_bad_title_reports_offset() {
        let err = Doe2HeaderParser
            .parse_header(&[BANNER, "", "not a title"])
            .unwrap_err();
        assert_eq!(err.pattern, REPORT_TITLE);
        assert_eq!(err.offset, TITLE_LINE);
    }

    #[test]
    fn test_header_missing_banner() {
        let err = Doe2HeaderParser.parse_header(&[]).unwrap_err();
        assert_eq!(err.pattern, RUN_BANNER);
        assert_eq!(err.line, "");
    }
}
