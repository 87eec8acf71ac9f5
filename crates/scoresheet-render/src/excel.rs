//! Excel (XLSX) report renderer
//!
//! Applies a [`ReportPlan`] to a `rust_xlsxwriter` workbook. Each cell can
//! receive several plan operations (a value with its number format, then any
//! number of style tags); they are merged per cell before anything is written
//! because the writer takes value and format together.
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Details                     Sheet: Summary
//! | Name | Score | Status |          | Metric        | Value |   +-----------------+
//! |------|-------|--------|          |---------------|-------|   | Pass / Fail     |
//! | Ada  | 91.00 | Pass   | (green)  | Pass Score    | 60.00 |   |   ##            |
//! | Bob  | 42.50 | Fail   | (red)    | ...           |       |   |   ##    ##      |
//!                                    | Pass Rate (%) | 50.00 |   +-----------------+
//! ```

use std::collections::BTreeMap;

use rust_xlsxwriter::{Chart, ChartType, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use scoresheet_core::style::{self, Align};
use scoresheet_core::{
    CellRef, CellValue, ChartSpec, NumberFormat, RenderError, Renderer, ReportPlan, SheetOp,
    StyleTag, WritePlan,
};
use tracing::debug;

/// Excel report renderer
#[derive(Clone, Debug)]
pub struct XlsxRenderer {
    /// Chart width in pixels
    pub chart_width: u32,
    /// Chart height in pixels
    pub chart_height: u32,
    /// Whether the chart shows a legend for its single series
    pub chart_legend: bool,
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        Self {
            chart_width: 480,
            chart_height: 288,
            chart_legend: false,
        }
    }
}

impl XlsxRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chart size in pixels
    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = width;
        self.chart_height = height;
        self
    }

    /// Show the chart legend
    pub fn with_legend(mut self) -> Self {
        self.chart_legend = true;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, plan: &ReportPlan) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();

        for sheet_plan in plan.sheets() {
            self.add_sheet(&mut workbook, sheet_plan)?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        debug!(bytes = buffer.len(), "workbook rendered");
        Ok(buffer)
    }

    fn add_sheet(&self, workbook: &mut Workbook, plan: &WritePlan) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&plan.sheet).map_err(format_error)?;

        let cells = merge_cells(plan);
        for (cell, state) in &cells {
            write_cell(sheet, *cell, state)?;
        }

        for op in &plan.ops {
            match op {
                SheetOp::FreezePane { cell } => {
                    let (row, col) = zero_based(*cell)?;
                    sheet.set_freeze_panes(row, col).map_err(format_error)?;
                }
                SheetOp::AutoFitColumns { widths } => {
                    for width in widths {
                        let (_, col) = zero_based(CellRef::new(1, width.col))?;
                        sheet
                            .set_column_width(col, width.width)
                            .map_err(format_error)?;
                    }
                }
                SheetOp::AddChart(spec) => self.insert_chart(sheet, &plan.sheet, spec)?,
                SheetOp::SetCell { .. } | SheetOp::SetStyle { .. } => {}
            }
        }

        debug!(sheet = %plan.sheet, cells = cells.len(), "sheet written");
        Ok(())
    }

    /// Column (vertical bar) chart over a single data series
    fn insert_chart(
        &self,
        sheet: &mut Worksheet,
        sheet_name: &str,
        spec: &ChartSpec,
    ) -> Result<(), RenderError> {
        let (data_first_row, data_col) = zero_based(spec.data.first)?;
        let (data_last_row, _) = zero_based(spec.data.last)?;
        let (cat_first_row, cat_col) = zero_based(spec.categories.first)?;
        let (cat_last_row, _) = zero_based(spec.categories.last)?;

        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_values((sheet_name, data_first_row, data_col, data_last_row, data_col))
            .set_categories((sheet_name, cat_first_row, cat_col, cat_last_row, cat_col));

        chart.title().set_name(&spec.title);
        chart.x_axis().set_name(&spec.x_axis_title);
        chart.y_axis().set_name(&spec.y_axis_title);
        chart.set_width(self.chart_width).set_height(self.chart_height);
        if !self.chart_legend {
            chart.legend().set_hidden();
        }

        let (row, col) = zero_based(spec.anchor)?;
        sheet.insert_chart(row, col, &chart).map_err(format_error)?;
        Ok(())
    }
}

/// Everything the plan says about one cell
#[derive(Debug, Default)]
struct CellState<'a> {
    value: Option<&'a CellValue>,
    number_format: Option<NumberFormat>,
    styles: Vec<StyleTag>,
}

fn merge_cells(plan: &WritePlan) -> BTreeMap<CellRef, CellState<'_>> {
    let mut cells: BTreeMap<CellRef, CellState<'_>> = BTreeMap::new();
    for op in &plan.ops {
        match op {
            SheetOp::SetCell {
                cell,
                value,
                number_format,
            } => {
                let state = cells.entry(*cell).or_default();
                state.value = Some(value);
                state.number_format = *number_format;
            }
            SheetOp::SetStyle { cell, style } => {
                cells.entry(*cell).or_default().styles.push(*style);
            }
            _ => {}
        }
    }
    cells
}

fn cell_format(state: &CellState<'_>) -> Format {
    let attrs = style::resolve(state.styles.iter().copied());
    let mut format = Format::new();

    if attrs.bold == Some(true) {
        format = format.set_bold();
    }
    match attrs.align {
        Some(Align::Left) => format = format.set_align(FormatAlign::Left),
        Some(Align::Right) => format = format.set_align(FormatAlign::Right),
        Some(Align::Center) => {
            format = format
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter);
        }
        None => {}
    }
    if let Some(rgb) = attrs.fill {
        format = format.set_background_color(rgb);
    }
    if let Some(number_format) = state.number_format {
        format = format.set_num_format(number_format.code());
    }
    format
}

fn write_cell(sheet: &mut Worksheet, cell: CellRef, state: &CellState<'_>) -> Result<(), RenderError> {
    let (row, col) = zero_based(cell)?;
    let format = cell_format(state);

    match state.value {
        Some(CellValue::Text(text)) => sheet.write_string_with_format(row, col, text, &format),
        Some(CellValue::Integer(n)) => sheet.write_number_with_format(row, col, *n as f64, &format),
        Some(CellValue::Number(x)) => sheet.write_number_with_format(row, col, *x, &format),
        None => sheet.write_blank(row, col, &format),
    }
    .map_err(format_error)?;
    Ok(())
}

/// Plan coordinates are 1-based; the writer is 0-based
fn zero_based(cell: CellRef) -> Result<(u32, u16), RenderError> {
    if cell.row == 0 || cell.col == 0 {
        return Err(RenderError::InvalidData(format!(
            "cell coordinates are 1-based, got row {} column {}",
            cell.row, cell.col
        )));
    }
    Ok((cell.row - 1, cell.col - 1))
}

fn format_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

impl Renderer for XlsxRenderer {
    type Output = Vec<u8>;

    fn render(&self, plan: &ReportPlan) -> Result<Vec<u8>, RenderError> {
        if plan.details.cells().next().is_none() {
            return Err(RenderError::InvalidData("No cells to render".into()));
        }
        self.render_to_bytes(plan)
    }
}
