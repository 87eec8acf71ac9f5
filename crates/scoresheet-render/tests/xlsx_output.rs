//! Integration tests for writing XLSX reports to disk

use std::fs;

use scoresheet_core::{RawRow, RawTable, ReportAssembler, ReportConfig, ReportError};
use scoresheet_render::{save_xlsx, write_report, XlsxRenderer};
use tempfile::tempdir;

fn class_table() -> RawTable {
    let rows = [
        ("Maria Rossi", "88"),
        ("Luca Bianchi", "59.5"),
        ("Marco Neri", "60"),
        ("Paolo Gialli", "97.25"),
        ("Giulia Verdi", "31"),
    ]
    .iter()
    .map(|(n, s)| RawRow::from_pairs([("name", *n), ("score", *s)]))
    .collect();
    RawTable::new(vec!["name".into(), "score".into()], rows)
}

#[test]
fn save_report_with_chart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    let plan = ReportAssembler::new(ReportConfig::default().with_chart())
        .assemble(&class_table())
        .unwrap();
    save_xlsx(&XlsxRenderer::new(), &plan, &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.len() > 100);
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn save_report_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    fs::write(&path, b"stale").unwrap();

    let plan = ReportAssembler::default().assemble(&class_table()).unwrap();
    save_xlsx(&XlsxRenderer::new(), &plan, &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn missing_output_directory_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("report.xlsx");

    match write_report(&path, b"PK") {
        Err(ReportError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn write_protected_report_is_locked_and_kept() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    fs::write(&path, b"previous").unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&path, permissions).unwrap();

    match write_report(&path, b"PK") {
        Err(ReportError::OutputLocked { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected OutputLocked, got {other:?}"),
    }
    assert_eq!(fs::read(&path).unwrap(), b"previous");
}

#[test]
fn successful_save_leaves_only_the_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    fs::write(&path, b"stale").unwrap();

    let plan = ReportAssembler::default().assemble(&class_table()).unwrap();
    save_xlsx(&XlsxRenderer::new(), &plan, &path).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, ["report.xlsx"]);
}
