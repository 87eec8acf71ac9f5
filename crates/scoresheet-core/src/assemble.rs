//! Report assembly
//!
//! Runs validation, statistics, layout and style rules in sequence and emits
//! one write plan per sheet. Any failure aborts the whole run; no plan is
//! produced for partially valid input.
//!
//! Within a sheet, operations are emitted in this order:
//! 1. every `SetCell`
//! 2. every `SetStyle`
//! 3. `FreezePane`
//! 4. `AddChart`, Summary only and only when enabled
//! 5. `AutoFitColumns`, last, since widths depend on the final cell contents

use tracing::{debug, info};

use crate::layout::{
    DetailsLayout, SummaryLayout, CHART_ANCHOR, DETAILS_SHEET, HEADER_ROW, METRIC_COL,
    SUMMARY_SHEET, VALUE_COL,
};
use crate::plan::{CellRef, ChartSpec, ReportPlan, SheetOp, WritePlan};
use crate::style;
use crate::validate;
use crate::{Metric, Metrics, RawTable, RecordSet, ReportConfig, ReportError};

pub const CHART_TITLE: &str = "Pass / Fail Summary";
pub const CHART_X_AXIS: &str = "Result";
pub const CHART_Y_AXIS: &str = "Count";

/// Orchestrates one report run
#[derive(Clone, Debug, Default)]
pub struct ReportAssembler {
    config: ReportConfig,
}

impl ReportAssembler {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Build the complete report plan for a parsed input table
    pub fn assemble(&self, table: &RawTable) -> Result<ReportPlan, ReportError> {
        let threshold = self.config.pass_threshold;

        let keys = validate::check_columns(&table.headers)?;
        debug!(rows = table.rows.len(), "header validated");

        let records = validate::validate_rows(&table.rows, &keys, threshold)?;
        let metrics = Metrics::compute(&records, threshold)?;
        let records = RecordSet::new(records)?;
        debug!(
            count = metrics.count,
            average = metrics.average,
            median = metrics.median,
            "metrics computed"
        );

        let details = self.details_plan(&records);
        let summary = self.summary_plan(&metrics);

        info!(
            records = metrics.count,
            pass_rate = metrics.pass_rate,
            chart = self.config.include_chart,
            "report planned"
        );

        Ok(ReportPlan {
            details,
            summary,
            metrics,
        })
    }

    fn details_plan(&self, records: &RecordSet) -> WritePlan {
        let layout = DetailsLayout::plan(records);
        let mut cells = Vec::new();
        let mut styles = Vec::new();

        for (i, header) in DetailsLayout::HEADERS.iter().enumerate() {
            let cell = CellRef::new(HEADER_ROW, i as u16 + 1);
            cells.push(SheetOp::SetCell {
                cell,
                value: (*header).into(),
                number_format: None,
            });
            styles.push(SheetOp::SetStyle {
                cell,
                style: style::header_style(),
            });
        }

        for (i, record) in records.iter().enumerate() {
            let row = layout.record_row(i);
            cells.push(SheetOp::SetCell {
                cell: CellRef::new(row, DetailsLayout::NAME_COL),
                value: record.name.as_str().into(),
                number_format: None,
            });
            cells.push(SheetOp::SetCell {
                cell: CellRef::new(row, DetailsLayout::SCORE_COL),
                value: record.score.into(),
                number_format: Some(style::score_format()),
            });
            cells.push(SheetOp::SetCell {
                cell: CellRef::new(row, DetailsLayout::STATUS_COL),
                value: record.status.as_str().into(),
                number_format: None,
            });

            let fill = style::row_style(record.status);
            for col in 1..=layout.column_count() {
                styles.push(SheetOp::SetStyle {
                    cell: CellRef::new(row, col),
                    style: fill,
                });
            }
        }

        finish_sheet(DETAILS_SHEET, cells, styles, layout.freeze_anchor(), None)
    }

    fn summary_plan(&self, metrics: &Metrics) -> WritePlan {
        let layout = SummaryLayout::plan();
        let mut cells = Vec::new();
        let mut styles = Vec::new();

        for (i, header) in SummaryLayout::HEADERS.iter().enumerate() {
            let cell = CellRef::new(HEADER_ROW, i as u16 + 1);
            cells.push(SheetOp::SetCell {
                cell,
                value: (*header).into(),
                number_format: None,
            });
            styles.push(SheetOp::SetStyle {
                cell,
                style: style::header_style(),
            });
        }

        for (metric, row) in layout.rows() {
            cells.push(SheetOp::SetCell {
                cell: CellRef::new(row, METRIC_COL),
                value: metric.label().into(),
                number_format: None,
            });
            cells.push(SheetOp::SetCell {
                cell: CellRef::new(row, VALUE_COL),
                value: metric.value(metrics),
                number_format: style::metric_format(metric),
            });
        }

        for row in layout.first_metric_row()..=layout.last_row() {
            for col in [METRIC_COL, VALUE_COL] {
                styles.push(SheetOp::SetStyle {
                    cell: CellRef::new(row, col),
                    style: style::summary_alignment(col),
                });
            }
        }

        styles.push(SheetOp::SetStyle {
            cell: CellRef::new(layout.row_of(Metric::PassRate), VALUE_COL),
            style: style::pass_rate_style(metrics.pass_rate),
        });
        if let Some(flag) = style::median_style(metrics.median, metrics.pass_threshold) {
            styles.push(SheetOp::SetStyle {
                cell: CellRef::new(layout.row_of(Metric::Median), VALUE_COL),
                style: flag,
            });
        }

        let chart = self.config.include_chart.then(|| ChartSpec {
            anchor: CHART_ANCHOR,
            data: layout.chart_data_range(),
            categories: layout.chart_category_range(),
            title: CHART_TITLE.to_string(),
            x_axis_title: CHART_X_AXIS.to_string(),
            y_axis_title: CHART_Y_AXIS.to_string(),
        });

        finish_sheet(SUMMARY_SHEET, cells, styles, layout.freeze_anchor(), chart)
    }
}

/// Concatenate a sheet's operations in emission order, sizing columns last
fn finish_sheet(
    sheet: &str,
    cells: Vec<SheetOp>,
    styles: Vec<SheetOp>,
    freeze: CellRef,
    chart: Option<ChartSpec>,
) -> WritePlan {
    let widths = style::column_widths(cells.iter().filter_map(|op| match op {
        SheetOp::SetCell { cell, value, .. } => Some((cell.col, value)),
        _ => None,
    }));

    let mut plan = WritePlan::new(sheet);
    plan.ops.extend(cells);
    plan.ops.extend(styles);
    plan.push(SheetOp::FreezePane { cell: freeze });
    if let Some(chart) = chart {
        plan.push(SheetOp::AddChart(chart));
    }
    plan.push(SheetOp::AutoFitColumns { widths });
    plan
}
