//! # scoresheet-parser
//!
//! Reads delimited score files into a [`RawTable`].
//!
//! The input convention is fixed: UTF-8, comma separated, first line is the
//! header. Columns beyond `name` and `score` are carried along but ignored by
//! the report.
//!
//! ## Example
//!
//! ```rust
//! use scoresheet_parser::parse_csv;
//!
//! let table = parse_csv("name,score\nAda,91\nBob,42.5\n").unwrap();
//! assert_eq!(table.headers, ["name", "score"]);
//! assert_eq!(table.rows.len(), 2);
//! assert_eq!(table.rows[1].get("score"), Some("42.5"));
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use scoresheet_core::validate::normalize_header;
use scoresheet_core::{RawRow, RawTable, ReportError};
use tracing::debug;

/// Parse CSV text already held in memory
pub fn parse_csv(input: &str) -> Result<RawTable, ReportError> {
    from_reader(input.as_bytes())
}

/// Read and parse a CSV file.
///
/// A path that does not resolve is reported as `InputNotFound`.
pub fn read_csv(path: &Path) -> Result<RawTable, ReportError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ReportError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => ReportError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let table = from_reader(file)?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "input parsed"
    );
    Ok(table)
}

/// Parse CSV from any reader
pub fn from_reader<R: Read>(reader: R) -> Result<RawTable, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| normalize_header(h).to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(malformed)?;
        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.as_str(), value);
        }
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

fn malformed(err: csv::Error) -> ReportError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    ReportError::MalformedInput {
        line,
        message: err.to_string(),
    }
}
