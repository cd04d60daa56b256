//! Reading DOE-2 `.SIM` files and splitting them into report sections.
//!
//! A `.SIM` file is a sequence of printed pages. Each page opens with a run
//! banner (optionally preceded by a form feed) and names its report on the
//! third line, e.g. `REPORT- BEPS Building Energy Performance`. A section is
//! one such page.

use crate::constants::{FORM_FEED, HEADER_LINE_COUNT};
use crate::error::{Result, SimError};
use crate::header::{is_page_banner, report_code, strip_form_feed};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One page of a report, with its lines and the report code it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Report code from the title line, if the page has one
    pub code: Option<String>,
    /// 1-based line number of the page banner within the file
    pub first_line: usize,
    pub lines: Vec<String>,
}

impl Section {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn new(first_line: usize, lines: Vec<String>) -> Self {
        let code = lines
            .get(HEADER_LINE_COUNT - 1)
            .and_then(|line| report_code(line));
        Self {
            code,
            first_line,
            lines,
        }
    }
}

/// A whole simulation report held in memory
#[derive(Debug, Clone)]
pub struct SimReport {
    name: String,
    sections: Vec<Section>,
}

impl SimReport {
    /// Read a report file; bytes that are not valid UTF-8 are replaced
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| SimError::io(path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        if matches!(text, std::borrow::Cow::Owned(_)) {
            warn!("{} contains invalid UTF-8; replaced", path.display());
        }
        Ok(Self::from_text(path.display().to_string(), &text))
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let name = name.into();
        let sections = split_sections(text);
        debug!("Split {} into {} sections", name, sections.len());
        Self { name, sections }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Report codes in page order, repeats included
    pub fn report_codes(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|section| section.code.as_deref())
            .collect()
    }

    /// First page carrying report `code` (case-insensitive)
    pub fn section(&self, code: &str) -> Result<&Section> {
        self.sections
            .iter()
            .find(|section| {
                section
                    .code
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(code))
            })
            .ok_or_else(|| SimError::SectionNotFound {
                code: code.to_string(),
                source_name: self.name.clone(),
            })
    }
}

/// Split report text into pages at each run banner.
///
/// Lines before the first banner are dropped, as are lines that hold nothing
/// but a form feed.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(usize, Vec<String>)> = None;

    for (index, raw) in text.lines().enumerate() {
        if raw.chars().all(|c| c == FORM_FEED) && !raw.is_empty() {
            continue;
        }

        if is_page_banner(raw) {
            if let Some((first_line, lines)) = current.take() {
                sections.push(Section::new(first_line, lines));
            }
            current = Some((index + 1, vec![strip_form_feed(raw).to_string()]));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(raw.to_string());
        }
    }

    if let Some((first_line, lines)) = current {
        sections.push(Section::new(first_line, lines));
    }

    sections
}
