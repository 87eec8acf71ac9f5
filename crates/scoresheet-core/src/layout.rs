//! Sheet layout planning
//!
//! The planner is the single source of truth for where things land. Style rules
//! and the chart range look rows up here instead of assuming fixed positions.
//!
//! ```text
//! Sheet: Details                  Sheet: Summary
//! | Name | Score | Status |       | Metric        | Value |
//! |------|-------|--------|       |---------------|-------|
//! | Ada  | 91.00 | Pass   |       | Pass Score    | 60.00 |   row 2
//! | Bob  | 42.50 | Fail   |       | Total         | 2     |
//!                                 | ...           |       |
//!                                 | Pass          | 1     |   row 8  (chart start)
//!                                 | Fail          | 1     |   row 9  (chart end)
//!                                 | Pass Count    | 1     |
//!                                 | Pass Rate (%) | 50.00 |   row 11
//! ```

use std::collections::BTreeMap;

use crate::plan::{CellRange, CellRef, CellValue};
use crate::{Metrics, RecordSet};

/// Name of the per-record sheet
pub const DETAILS_SHEET: &str = "Details";

/// Name of the statistics sheet
pub const SUMMARY_SHEET: &str = "Summary";

/// Every sheet starts with a single header row
pub const HEADER_ROW: u32 = 1;

/// Column holding metric labels / chart categories
pub const METRIC_COL: u16 = 1;

/// Column holding metric values / chart data
pub const VALUE_COL: u16 = 2;

/// Where the Pass/Fail chart is anchored on the Summary sheet (D2)
pub const CHART_ANCHOR: CellRef = CellRef::new(2, 4);

// ============================================================================
// Details
// ============================================================================

/// Column positions and row mapping for the Details sheet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailsLayout {
    record_count: usize,
}

impl DetailsLayout {
    pub const NAME_COL: u16 = 1;
    pub const SCORE_COL: u16 = 2;
    pub const STATUS_COL: u16 = 3;
    pub const HEADERS: [&'static str; 3] = ["Name", "Score", "Status"];
    pub const FIRST_DATA_ROW: u32 = HEADER_ROW + 1;

    pub fn plan(records: &RecordSet) -> Self {
        Self {
            record_count: records.len(),
        }
    }

    /// Row of the `index`-th record (0-based index, input order)
    pub fn record_row(&self, index: usize) -> u32 {
        Self::FIRST_DATA_ROW + index as u32
    }

    pub fn last_row(&self) -> u32 {
        HEADER_ROW + self.record_count as u32
    }

    pub fn column_count(&self) -> u16 {
        Self::HEADERS.len() as u16
    }

    /// Keeps the header visible while scrolling
    pub fn freeze_anchor(&self) -> CellRef {
        CellRef::new(Self::FIRST_DATA_ROW, 1)
    }
}

// ============================================================================
// Summary
// ============================================================================

/// The fixed summary rows, in sheet order.
///
/// Reordering variants changes row positions seen by style rules and the chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    PassScore,
    Total,
    Average,
    Median,
    Max,
    Min,
    Pass,
    Fail,
    PassCount,
    PassRate,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::PassScore,
        Metric::Total,
        Metric::Average,
        Metric::Median,
        Metric::Max,
        Metric::Min,
        Metric::Pass,
        Metric::Fail,
        Metric::PassCount,
        Metric::PassRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::PassScore => "Pass Score",
            Metric::Total => "Total",
            Metric::Average => "Average",
            Metric::Median => "Median",
            Metric::Max => "Max",
            Metric::Min => "Min",
            Metric::Pass => "Pass",
            Metric::Fail => "Fail",
            Metric::PassCount => "Pass Count",
            Metric::PassRate => "Pass Rate (%)",
        }
    }

    /// The value shown for this metric
    pub fn value(&self, metrics: &Metrics) -> CellValue {
        match self {
            Metric::PassScore => metrics.pass_threshold.into(),
            Metric::Total => metrics.count.into(),
            Metric::Average => metrics.average.into(),
            Metric::Median => metrics.median.into(),
            Metric::Max => metrics.max.into(),
            Metric::Min => metrics.min.into(),
            Metric::Pass | Metric::PassCount => metrics.pass_count.into(),
            Metric::Fail => metrics.fail_count().into(),
            Metric::PassRate => metrics.pass_rate.into(),
        }
    }
}

/// Row assignment for the Summary sheet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryLayout {
    rows: BTreeMap<Metric, u32>,
}

impl SummaryLayout {
    pub const HEADERS: [&'static str; 2] = ["Metric", "Value"];

    /// Assign rows to the fixed metric list, directly below the header.
    ///
    /// Independent of the number of records.
    pub fn plan() -> Self {
        let rows = Metric::ALL
            .iter()
            .enumerate()
            .map(|(i, metric)| (*metric, HEADER_ROW + 1 + i as u32))
            .collect();
        Self { rows }
    }

    pub fn row_of(&self, metric: Metric) -> u32 {
        // every variant is inserted by `plan`
        self.rows[&metric]
    }

    /// Metrics with their rows, in sheet order
    pub fn rows(&self) -> impl Iterator<Item = (Metric, u32)> + '_ {
        Metric::ALL.iter().map(|m| (*m, self.row_of(*m)))
    }

    pub fn first_metric_row(&self) -> u32 {
        HEADER_ROW + 1
    }

    pub fn last_row(&self) -> u32 {
        self.rows.values().copied().max().unwrap_or(HEADER_ROW)
    }

    pub fn freeze_anchor(&self) -> CellRef {
        CellRef::new(HEADER_ROW + 1, 1)
    }

    /// Chart values: the Value column from the Pass row through the Fail row
    pub fn chart_data_range(&self) -> CellRange {
        CellRange::column(
            VALUE_COL,
            self.row_of(Metric::Pass),
            self.row_of(Metric::Fail),
        )
    }

    /// Chart categories: the Metric column over the same rows
    pub fn chart_category_range(&self) -> CellRange {
        CellRange::column(
            METRIC_COL,
            self.row_of(Metric::Pass),
            self.row_of(Metric::Fail),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    #[test]
    fn summary_rows_follow_fixed_order() {
        let layout = SummaryLayout::plan();
        let rows: Vec<_> = layout.rows().collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], (Metric::PassScore, 2));
        assert_eq!(rows[9], (Metric::PassRate, 11));
        assert_eq!(layout.row_of(Metric::Median), 5);
        assert_eq!(layout.row_of(Metric::Pass), 8);
        assert_eq!(layout.row_of(Metric::Fail), 9);
        assert_eq!(layout.last_row(), 11);
    }

    #[test]
    fn chart_ranges_span_pass_and_fail() {
        let layout = SummaryLayout::plan();
        let data = layout.chart_data_range();
        let categories = layout.chart_category_range();
        assert_eq!(data.to_string(), "B8:B9");
        assert_eq!(categories.to_string(), "A8:A9");
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.first.row, layout.row_of(Metric::Pass));
        assert_eq!(data.last.row, layout.row_of(Metric::Fail));
    }

    #[test]
    fn details_rows_follow_input_order() {
        let set = RecordSet::new(vec![
            Record::new("a", 1.0, 60.0),
            Record::new("b", 2.0, 60.0),
            Record::new("c", 3.0, 60.0),
        ])
        .unwrap();
        let layout = DetailsLayout::plan(&set);
        assert_eq!(layout.record_row(0), 2);
        assert_eq!(layout.record_row(2), 4);
        assert_eq!(layout.last_row(), 4);
        assert_eq!(layout.column_count(), 3);
        assert_eq!(layout.freeze_anchor().to_string(), "A2");
    }

    #[test]
    fn metric_labels() {
        let labels: Vec<_> = Metric::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(
            labels,
            [
                "Pass Score",
                "Total",
                "Average",
                "Median",
                "Max",
                "Min",
                "Pass",
                "Fail",
                "Pass Count",
                "Pass Rate (%)"
            ]
        );
    }
}
