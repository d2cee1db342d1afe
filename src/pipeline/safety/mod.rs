//! Safety layer for model-written, patient-facing text.
//!
//! `output_sanitize` strips model artifacts, `keywords` detects
//! diagnostic / prescriptive / alarm language, and `filter` replaces
//! flagged text with deterministic wording built from the results.

pub mod output_sanitize;
pub mod keywords;
pub mod filter;

pub use output_sanitize::*;
pub use keywords::*;
pub use filter::*;

use serde::Serialize;

/// A span of unsafe language found by the keyword scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub category: ViolationCategory,
    pub matched_text: String,
    /// Byte offset in the scanned text.
    pub offset: usize,
    pub length: usize,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// "you have [condition]"
    DiagnosticLanguage,
    /// "you should [take/stop]"
    PrescriptiveLanguage,
    /// "dangerous", "immediately"
    AlarmLanguage,
}
