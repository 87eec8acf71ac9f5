//! Summary statistics over a record set

use serde::Serialize;

use crate::{Record, ReportError};

/// Aggregate statistics computed once per report run.
///
/// No rounding is applied here; two-decimal display is a formatting directive
/// carried in the write plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    pub pass_count: usize,
    /// Percentage in `0..=100`
    pub pass_rate: f64,
    pub pass_threshold: f64,
}

impl Metrics {
    /// Reduce records into metrics. Fails with `EmptyDataset` on an empty slice.
    pub fn compute(records: &[Record], pass_threshold: f64) -> Result<Self, ReportError> {
        if records.is_empty() {
            return Err(ReportError::EmptyDataset);
        }

        let count = records.len();
        let mut scores: Vec<f64> = records.iter().map(|r| r.score).collect();
        scores.sort_by(f64::total_cmp);

        let pass_count = records.iter().filter(|r| r.is_pass()).count();

        Ok(Self {
            count,
            average: mean(&scores),
            median: median_of_sorted(&scores),
            max: scores[count - 1],
            min: scores[0],
            pass_count,
            pass_rate: pass_count as f64 / count as f64 * 100.0,
            pass_threshold,
        })
    }

    pub fn fail_count(&self) -> usize {
        self.count - self.pass_count
    }
}

/// Arithmetic mean of a non-empty slice of finite values.
///
/// Falls back to summing pre-divided terms when the plain sum overflows.
fn mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum()
    }
}

/// Median of a non-empty, ascending slice
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        sorted[mid - 1] / 2.0 + sorted[mid] / 2.0
    } else {
        sorted[mid]
    }
}
