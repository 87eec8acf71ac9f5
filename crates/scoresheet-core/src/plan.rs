//! Write plan: the declarative sheet operations handed to a renderer
//!
//! Rows and columns are 1-based, matching spreadsheet notation (`A1` is
//! row 1, column 1). Renderers convert to whatever indexing they need.

use std::fmt;

use crate::style::StyleTag;
use crate::Metrics;

/// A single cell position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Column letters for a 1-based column index (1 -> A, 27 -> AA)
    pub fn col_to_letter(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32;
        while n > 0 {
            let rem = (n - 1) % 26;
            result.insert(0, (b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        result
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::col_to_letter(self.col), self.row)
    }
}

/// An inclusive rectangular range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub first: CellRef,
    pub last: CellRef,
}

impl CellRange {
    pub const fn new(first: CellRef, last: CellRef) -> Self {
        Self { first, last }
    }

    /// A vertical range within one column
    pub const fn column(col: u16, first_row: u32, last_row: u32) -> Self {
        Self {
            first: CellRef::new(first_row, col),
            last: CellRef::new(last_row, col),
        }
    }

    pub fn row_count(&self) -> u32 {
        self.last.row - self.first.row + 1
    }

    /// Absolute reference qualified with a sheet name, e.g. `Summary!$B$8:$B$9`
    pub fn to_formula(&self, sheet: &str) -> String {
        format!(
            "{}!${}${}:${}${}",
            sheet,
            CellRef::col_to_letter(self.first.col),
            self.first.row,
            CellRef::col_to_letter(self.last.col),
            self.last.row
        )
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}

/// A cell's underlying value
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl CellValue {
    /// Stringified form used for column width estimation.
    ///
    /// Floats keep at least one fractional digit (`75.0`), regardless of
    /// the display format applied to the cell.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Number(x) => format!("{x:?}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Number(x)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Integer(n as i64)
    }
}

/// Display-only number formats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberFormat {
    /// Exactly two decimal places
    TwoDecimals,
}

impl NumberFormat {
    /// Spreadsheet format code
    pub fn code(&self) -> &'static str {
        match self {
            NumberFormat::TwoDecimals => "0.00",
        }
    }
}

/// Estimated display width for one column
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnWidth {
    pub col: u16,
    pub width: f64,
}

/// Bar chart descriptor
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    /// Top-left cell the chart is anchored at
    pub anchor: CellRef,
    /// Single data series (values)
    pub data: CellRange,
    /// Category labels for the series
    pub categories: CellRange,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

/// One operation against a sheet
#[derive(Clone, Debug, PartialEq)]
pub enum SheetOp {
    SetCell {
        cell: CellRef,
        value: CellValue,
        number_format: Option<NumberFormat>,
    },
    SetStyle {
        cell: CellRef,
        style: StyleTag,
    },
    /// Freeze rows above and columns left of `cell`
    FreezePane { cell: CellRef },
    AutoFitColumns { widths: Vec<ColumnWidth> },
    AddChart(ChartSpec),
}

/// Ordered operations for one sheet
#[derive(Clone, Debug, PartialEq)]
pub struct WritePlan {
    pub sheet: String,
    pub ops: Vec<SheetOp>,
}

impl WritePlan {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: SheetOp) {
        self.ops.push(op);
    }

    /// Iterate over `(cell, value)` of every `SetCell` operation
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &CellValue)> {
        self.ops.iter().filter_map(|op| match op {
            SheetOp::SetCell { cell, value, .. } => Some((*cell, value)),
            _ => None,
        })
    }

    /// Value written to `cell`, if any
    pub fn value_at(&self, cell: CellRef) -> Option<&CellValue> {
        self.cells().find(|(c, _)| *c == cell).map(|(_, v)| v)
    }

    /// Every style tag applied to `cell`, in emission order
    pub fn styles_at(&self, cell: CellRef) -> Vec<StyleTag> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SheetOp::SetStyle { cell: c, style } if *c == cell => Some(*style),
                _ => None,
            })
            .collect()
    }

    pub fn chart(&self) -> Option<&ChartSpec> {
        self.ops.iter().find_map(|op| match op {
            SheetOp::AddChart(chart) => Some(chart),
            _ => None,
        })
    }
}

/// The complete output of one report run
#[derive(Clone, Debug, PartialEq)]
pub struct ReportPlan {
    pub details: WritePlan,
    pub summary: WritePlan,
    pub metrics: Metrics,
}

impl ReportPlan {
    /// Sheets in workbook order
    pub fn sheets(&self) -> [&WritePlan; 2] {
        [&self.details, &self.summary]
    }
}
