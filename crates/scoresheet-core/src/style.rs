//! Style rules
//!
//! Pure `value -> style tag` mappings. Nothing here touches a sheet; the
//! assembler records the resulting tags in the write plan and a renderer
//! resolves them through [`StyleTag::attributes`].
//!
//! ## Palette
//!
//! | Tag | Fill |
//! |-----|------|
//! | `Header` | `EDEDED` light gray (bold, centered) |
//! | `PassRow` | `E8F5E9` light green |
//! | `FailRow` | `FFEBEE` light red |
//! | `RateGood` | `E8F5E9` green |
//! | `RateWarning` | `FFF8E1` yellow |
//! | `RateBad` | `FFEBEE` red |
//! | `MedianBelowThreshold` | `FFCDD2` red tint |

use crate::layout::Metric;
use crate::plan::{CellValue, ColumnWidth, NumberFormat};
use crate::Status;

/// Pass rate at or above this is shown green
pub const RATE_GOOD: f64 = 80.0;

/// Pass rate at or above this (and below `RATE_GOOD`) is shown yellow
pub const RATE_WARNING: f64 = 60.0;

pub const MIN_COLUMN_WIDTH: usize = 10;
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Padding added to the longest value in a column
const WIDTH_PADDING: usize = 2;

/// Horizontal alignment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A named visual treatment, independent of the rendering technology
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleTag {
    Header,
    PassRow,
    FailRow,
    RateGood,
    RateWarning,
    RateBad,
    MedianBelowThreshold,
    AlignLeft,
    AlignRight,
}

/// Concrete attributes behind a tag. `None` leaves the attribute untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleAttributes {
    pub bold: Option<bool>,
    pub align: Option<Align>,
    /// RGB fill color
    pub fill: Option<u32>,
}

impl StyleAttributes {
    /// Overlay `other` on top of `self`
    pub fn merge(self, other: StyleAttributes) -> Self {
        Self {
            bold: other.bold.or(self.bold),
            align: other.align.or(self.align),
            fill: other.fill.or(self.fill),
        }
    }
}

impl StyleTag {
    pub fn attributes(&self) -> StyleAttributes {
        let fill = |rgb| StyleAttributes {
            fill: Some(rgb),
            ..Default::default()
        };
        match self {
            StyleTag::Header => StyleAttributes {
                bold: Some(true),
                align: Some(Align::Center),
                fill: Some(0xEDEDED),
            },
            StyleTag::PassRow | StyleTag::RateGood => fill(0xE8F5E9),
            StyleTag::FailRow | StyleTag::RateBad => fill(0xFFEBEE),
            StyleTag::RateWarning => fill(0xFFF8E1),
            StyleTag::MedianBelowThreshold => fill(0xFFCDD2),
            StyleTag::AlignLeft => StyleAttributes {
                align: Some(Align::Left),
                ..Default::default()
            },
            StyleTag::AlignRight => StyleAttributes {
                align: Some(Align::Right),
                ..Default::default()
            },
        }
    }
}

/// Resolve several tags applied to one cell, later tags winning
pub fn resolve(tags: impl IntoIterator<Item = StyleTag>) -> StyleAttributes {
    tags.into_iter()
        .fold(StyleAttributes::default(), |acc, tag| acc.merge(tag.attributes()))
}

// ============================================================================
// Rules
// ============================================================================

/// Header cells of every sheet
pub fn header_style() -> StyleTag {
    StyleTag::Header
}

/// Fill for every cell of a Details row
pub fn row_style(status: Status) -> StyleTag {
    match status {
        Status::Pass => StyleTag::PassRow,
        Status::Fail => StyleTag::FailRow,
    }
}

/// Pass-rate band. Uses fixed cut-offs, not the pass threshold.
pub fn pass_rate_style(pass_rate: f64) -> StyleTag {
    if pass_rate >= RATE_GOOD {
        StyleTag::RateGood
    } else if pass_rate >= RATE_WARNING {
        StyleTag::RateWarning
    } else {
        StyleTag::RateBad
    }
}

/// Flags a cohort whose median sits below the pass threshold
pub fn median_style(median: f64, pass_threshold: f64) -> Option<StyleTag> {
    (median < pass_threshold).then_some(StyleTag::MedianBelowThreshold)
}

/// Summary metric column is left aligned, value column right aligned
pub fn summary_alignment(col: u16) -> StyleTag {
    if col == crate::layout::METRIC_COL {
        StyleTag::AlignLeft
    } else {
        StyleTag::AlignRight
    }
}

/// Display format for the Details Score column
pub fn score_format() -> NumberFormat {
    NumberFormat::TwoDecimals
}

/// Display format for a Summary value; counts stay unformatted
pub fn metric_format(metric: Metric) -> Option<NumberFormat> {
    match metric {
        Metric::PassScore
        | Metric::Average
        | Metric::Median
        | Metric::Max
        | Metric::Min
        | Metric::PassRate => Some(NumberFormat::TwoDecimals),
        Metric::Total | Metric::Pass | Metric::Fail | Metric::PassCount => None,
    }
}

// ============================================================================
// Column widths
// ============================================================================

/// Width for a column whose longest stringified value has `max_len` characters
pub fn column_width(max_len: usize) -> f64 {
    (max_len + WIDTH_PADDING).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) as f64
}

/// Estimate widths for every column from the final cell contents.
///
/// Must run after all values of the sheet are known. Columns are returned in
/// ascending order, from 1 through the rightmost populated column.
pub fn column_widths<'a>(
    cells: impl IntoIterator<Item = (u16, &'a CellValue)>,
) -> Vec<ColumnWidth> {
    let mut longest: Vec<usize> = Vec::new();
    for (col, value) in cells {
        let idx = usize::from(col.saturating_sub(1));
        if longest.len() <= idx {
            longest.resize(idx + 1, 0);
        }
        let len = value.display_text().chars().count();
        longest[idx] = longest[idx].max(len);
    }

    longest
        .into_iter()
        .enumerate()
        .map(|(idx, len)| ColumnWidth {
            col: idx as u16 + 1,
            width: column_width(len),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_rate_bands() {
        assert_eq!(pass_rate_style(100.0), StyleTag::RateGood);
        assert_eq!(pass_rate_style(80.0), StyleTag::RateGood);
        assert_eq!(pass_rate_style(79.99), StyleTag::RateWarning);
        assert_eq!(pass_rate_style(60.0), StyleTag::RateWarning);
        assert_eq!(pass_rate_style(59.99), StyleTag::RateBad);
        assert_eq!(pass_rate_style(0.0), StyleTag::RateBad);
    }

    #[test]
    fn median_flag_only_below_threshold() {
        assert_eq!(
            median_style(55.0, 60.0),
            Some(StyleTag::MedianBelowThreshold)
        );
        assert_eq!(median_style(60.0, 60.0), None);
        assert_eq!(median_style(75.0, 60.0), None);
    }

    #[test]
    fn rows_colored_by_status() {
        assert_eq!(row_style(Status::Pass), StyleTag::PassRow);
        assert_eq!(row_style(Status::Fail), StyleTag::FailRow);
        assert_eq!(row_style(Status::Pass).attributes().fill, Some(0xE8F5E9));
        assert_eq!(row_style(Status::Fail).attributes().fill, Some(0xFFEBEE));
    }

    #[test]
    fn header_is_bold_centered_gray() {
        let attrs = header_style().attributes();
        assert_eq!(attrs.bold, Some(true));
        assert_eq!(attrs.align, Some(Align::Center));
        assert_eq!(attrs.fill, Some(0xEDEDED));
    }

    #[test]
    fn merged_tags_keep_both_attributes() {
        let attrs = resolve([StyleTag::AlignRight, StyleTag::RateWarning]);
        assert_eq!(attrs.align, Some(Align::Right));
        assert_eq!(attrs.fill, Some(0xFFF8E1));
        assert_eq!(attrs.bold, None);
    }

    #[test]
    fn score_like_metrics_get_two_decimals() {
        assert_eq!(metric_format(Metric::Median), Some(NumberFormat::TwoDecimals));
        assert_eq!(metric_format(Metric::PassRate), Some(NumberFormat::TwoDecimals));
        assert_eq!(metric_format(Metric::Total), None);
        assert_eq!(metric_format(Metric::Fail), None);
    }

    #[test]
    fn width_is_clamped() {
        assert_eq!(column_width(0), 10.0);
        assert_eq!(column_width(8), 10.0);
        assert_eq!(column_width(9), 11.0);
        assert_eq!(column_width(38), 40.0);
        assert_eq!(column_width(500), 40.0);
    }

    #[test]
    fn widths_use_longest_value_per_column() {
        let name = CellValue::from("Maximilian Alexander Featherstonehaugh");
        let header = CellValue::from("Name");
        let score = CellValue::Number(75.5);
        let widths = column_widths([(1, &header), (1, &name), (2, &score)]);
        assert_eq!(
            widths,
            [
                ColumnWidth { col: 1, width: 40.0 },
                ColumnWidth { col: 2, width: 10.0 },
            ]
        );
    }
}
