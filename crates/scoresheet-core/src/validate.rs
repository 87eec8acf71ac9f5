//! Record validation
//!
//! Turns raw input rows into classified [`Record`]s. The header check runs once
//! before any row is looked at; row validation stops at the first bad score.

use crate::{classify, RawRow, Record, ReportError, NAME_COLUMN, SCORE_COLUMN};

/// Header keys the required columns were found under.
///
/// Rows are keyed by the header text exactly as read, so lookups go through
/// these keys rather than the bare column names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnKeys {
    pub name: String,
    pub score: String,
}

impl Default for ColumnKeys {
    fn default() -> Self {
        Self {
            name: NAME_COLUMN.to_string(),
            score: SCORE_COLUMN.to_string(),
        }
    }
}

/// Check that the header carries every required column and resolve the keys
/// they appear under. With duplicate headers the last one wins.
pub fn check_columns<S: AsRef<str>>(headers: &[S]) -> Result<ColumnKeys, ReportError> {
    let find = |required: &str| -> Option<String> {
        headers.iter().rev().find_map(|h| {
            let header: &str = h.as_ref();
            (normalize_header(header) == required).then(|| header.to_string())
        })
    };

    match (find(NAME_COLUMN), find(SCORE_COLUMN)) {
        (Some(name), Some(score)) => Ok(ColumnKeys { name, score }),
        (name, score) => {
            let missing = [(NAME_COLUMN, name.is_none()), (SCORE_COLUMN, score.is_none())]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(column, _)| column.to_string())
                .collect();
            Err(ReportError::MissingColumns { missing })
        }
    }
}

/// Header names are compared without surrounding whitespace or a leading BOM
pub fn normalize_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

/// Parse a raw score string into a finite real number.
pub fn parse_score(name: &str, raw: &str) -> Result<f64, ReportError> {
    let invalid = || ReportError::InvalidScore {
        name: name.to_string(),
        raw: raw.to_string(),
    };

    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Validate and classify a single row.
pub fn validate_row(
    row: &RawRow,
    keys: &ColumnKeys,
    pass_threshold: f64,
) -> Result<Record, ReportError> {
    let name = row.get(&keys.name).unwrap_or_default();
    let raw_score = row.get(&keys.score).unwrap_or_default();
    let score = parse_score(name, raw_score)?;

    Ok(Record {
        name: name.to_string(),
        score,
        status: classify(score, pass_threshold),
    })
}

/// Validate every row in input order, aborting on the first failure.
pub fn validate_rows(
    rows: &[RawRow],
    keys: &ColumnKeys,
    pass_threshold: f64,
) -> Result<Vec<Record>, ReportError> {
    rows.iter()
        .map(|row| validate_row(row, keys, pass_threshold))
        .collect()
}
