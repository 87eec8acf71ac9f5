//! # scoresheet-render
//!
//! Rendering backends for scoresheet report plans.
//!
//! This crate provides:
//! - Excel (XLSX) rendering of a `ReportPlan`
//! - Writing the rendered artifact with lock detection
//!
//! ## Example
//!
//! ```rust,ignore
//! use scoresheet_core::{ReportAssembler, ReportConfig, Renderer};
//! use scoresheet_render::{write_report, XlsxRenderer};
//!
//! let plan = ReportAssembler::new(ReportConfig::default().with_chart()).assemble(&table)?;
//! let xlsx_bytes = XlsxRenderer::new().render(&plan)?;
//! write_report("report.xlsx".as_ref(), &xlsx_bytes)?;
//! ```

pub mod excel;
pub mod output;

pub use excel::XlsxRenderer;
pub use output::{is_locked, write_error, write_report};

use std::path::Path;

use scoresheet_core::{Renderer, ReportError, ReportPlan};

/// Render a plan to XLSX and write it to `path`.
///
/// The workbook is fully built in memory before the file is touched, and the
/// file is replaced in one rename, so a failure never leaves a partial artifact.
pub fn save_xlsx(renderer: &XlsxRenderer, plan: &ReportPlan, path: &Path) -> Result<(), ReportError> {
    let bytes = renderer.render(plan)?;
    write_report(path, &bytes)
}
