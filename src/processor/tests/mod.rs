//! Integration tests for the processor module
//!
//! Tests the complete processing pipeline against report files written to
//! temporary directories.


/// A three-page report whose second page is a BEPS section
pub const OFFICE_SIM: &str = include_str!("../../../tests/fixtures/office.SIM");
