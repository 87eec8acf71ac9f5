//! # scoresheet-core
//!
//! Core domain model and report pipeline for the scoresheet report generator.
//!
//! This crate provides:
//! - Domain types: `RawRow`, `Record`, `RecordSet`, `Metrics`, `ReportConfig`
//! - The pure pipeline: validation, statistics, layout and style rules
//! - The `WritePlan` handed to a rendering backend through the `Renderer` trait
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use scoresheet_core::{RawRow, RawTable, ReportAssembler, ReportConfig};
//!
//! let table = RawTable::new(
//!     vec!["name".into(), "score".into()],
//!     vec![
//!         RawRow::from_pairs([("name", "Ada"), ("score", "91")]),
//!         RawRow::from_pairs([("name", "Bob"), ("score", "42.5")]),
//!     ],
//! );
//!
//! let plan = ReportAssembler::new(ReportConfig::default().with_chart())
//!     .assemble(&table)
//!     .unwrap();
//! assert_eq!(plan.metrics.count, 2);
//! assert_eq!(plan.metrics.pass_count, 1);
//! ```

pub mod assemble;
pub mod layout;
pub mod plan;
pub mod stats;
pub mod style;
pub mod validate;

pub use assemble::ReportAssembler;
pub use layout::{DetailsLayout, Metric, SummaryLayout};
pub use plan::{
    CellRange, CellRef, CellValue, ChartSpec, ColumnWidth, NumberFormat, ReportPlan, SheetOp,
    WritePlan,
};
pub use stats::Metrics;
pub use style::{Align, StyleAttributes, StyleTag};
pub use validate::ColumnKeys;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Column that carries the record name
pub const NAME_COLUMN: &str = "name";

/// Column that carries the raw score
pub const SCORE_COLUMN: &str = "score";

/// Default inclusive pass threshold
pub const DEFAULT_PASS_THRESHOLD: f64 = 60.0;

// ============================================================================
// Raw Input
// ============================================================================

/// One input line, keyed by header name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, value)` pairs. Later duplicates win.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A parsed input file: header names plus data rows in input order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Pass/Fail classification of a single record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "Pass",
            Status::Fail => "Fail",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a score against the pass threshold.
///
/// The threshold itself is a pass (inclusive lower bound).
pub fn classify(score: f64, pass_threshold: f64) -> Status {
    if score >= pass_threshold {
        Status::Pass
    } else {
        Status::Fail
    }
}

/// A validated, classified input row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub score: f64,
    pub status: Status,
}

impl Record {
    pub fn new(name: impl Into<String>, score: f64, pass_threshold: f64) -> Self {
        Self {
            name: name.into(),
            score,
            status: classify(score, pass_threshold),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }
}

/// Non-empty, input-ordered collection of records
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Result<Self, ReportError> {
        if records.is_empty() {
            return Err(ReportError::EmptyDataset);
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Never true for a set built through `new`
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Options recognised by a report run
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Minimum score (inclusive) classified as Pass
    pub pass_threshold: f64,
    /// Whether the Summary sheet gets a Pass/Fail bar chart
    pub include_chart: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            include_chart: false,
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pass threshold
    pub fn pass_threshold(mut self, threshold: f64) -> Self {
        self.pass_threshold = threshold;
        self
    }

    /// Include the Pass/Fail chart on the Summary sheet
    pub fn with_chart(mut self) -> Self {
        self.include_chart = true;
        self
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A rendering backend that consumes a finished report plan
pub trait Renderer {
    type Output;

    /// Render the plan to the backend's output format
    fn render(&self, plan: &ReportPlan) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Report pipeline error
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("file not found -> {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("CSV must contain columns: name, score (missing: {})", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Score '{raw}' for '{name}' is not a number.")]
    InvalidScore { name: String, raw: String },

    #[error("No valid data rows found in CSV file.")]
    EmptyDataset,

    #[error("output file {} is open elsewhere or not writable", path.display())]
    OutputLocked { path: PathBuf },

    #[error("malformed input at line {line}: {message}")]
    MalformedInput { line: u64, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ReportError {
    /// Remediation hint shown after the error line, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ReportError::OutputLocked { .. } => {
                Some("close the spreadsheet in any other application and retry")
            }
            ReportError::MissingColumns { .. } => {
                Some("the first line of the input must be a header naming both columns")
            }
            _ => None,
        }
    }
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_threshold_is_inclusive() {
        for t in [0.0, 59.5, 60.0, 100.0, -3.25] {
            assert_eq!(classify(t, t), Status::Pass);
        }
    }

    #[test]
    fn classify_below_threshold_fails() {
        assert_eq!(classify(59.99, 60.0), Status::Fail);
        assert_eq!(classify(60.01, 60.0), Status::Pass);
    }

    #[test]
    fn classify_is_monotonic() {
        let threshold = 70.0;
        let scores = [10.0, 69.9, 70.0, 70.1, 99.0];
        for pair in scores.windows(2) {
            if classify(pair[0], threshold) == Status::Pass {
                assert_eq!(classify(pair[1], threshold), Status::Pass);
            }
        }
    }

    #[test]
    fn record_set_rejects_empty() {
        assert!(matches!(
            RecordSet::new(Vec::new()),
            Err(ReportError::EmptyDataset)
        ));
    }

    #[test]
    fn record_set_keeps_input_order() {
        let set = RecordSet::new(vec![
            Record::new("b", 1.0, 60.0),
            Record::new("a", 99.0, 60.0),
        ])
        .unwrap();
        let names: Vec<_> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn raw_row_later_duplicate_wins() {
        let row = RawRow::from_pairs([("score", "1"), ("score", "2")]);
        assert_eq!(row.get("score"), Some("2"));
        assert_eq!(row.get("name"), None);
    }

    #[test]
    fn config_builder() {
        let config = ReportConfig::new().pass_threshold(75.0).with_chart();
        assert_eq!(config.pass_threshold, 75.0);
        assert!(config.include_chart);

        let default = ReportConfig::default();
        assert_eq!(default.pass_threshold, 60.0);
        assert!(!default.include_chart);
    }

    #[test]
    fn error_messages_are_single_line() {
        let errors = [
            ReportError::InputNotFound { path: "in.csv".into() },
            ReportError::MissingColumns { missing: vec!["score".into()] },
            ReportError::InvalidScore { name: "Ada".into(), raw: "abc".into() },
            ReportError::EmptyDataset,
            ReportError::OutputLocked { path: "out.xlsx".into() },
        ];
        for err in &errors {
            assert!(!err.to_string().contains('\n'), "{err}");
        }
        assert_eq!(
            errors[2].to_string(),
            "Score 'abc' for 'Ada' is not a number."
        );
        assert!(errors[4].hint().is_some());
    }
}
