//! Loader tests against files on disk

use std::fs;
use std::path::Path;

use jiff::civil::date;
use tempfile::TempDir;

use crate::data::{CsvDirectory, CsvFile, PriceSource};
use crate::error::DataError;
use crate::model::ReturnKind;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "VTI_HistoricalData.csv",
        "Date,Close/Last,Volume\n01/04/2024,$102.00,1\n01/02/2024,$100.00,1\n01/03/2024,$101.00,1\n",
    );
    write(
        dir.path(),
        "QQQ_HistoricalData.csv",
        "Date,Open,Close\n2024-01-02,1,400\n2024-01-03,1,404\n2024-01-05,1,410\n",
    );
    write(
        dir.path(),
        "SPY_HistoricalData.csv",
        "Date,Close\n2024-01-02,470\n2024-01-03,475\n",
    );
    write(dir.path(), "notes.txt", "not a price file");
    dir
}

#[test]
fn test_directory_excludes_benchmark_and_aligns() {
    let dir = fixture();
    let source = CsvDirectory::new(dir.path()).excluding("SPY");
    let frame = source.frame().unwrap();

    // files are read in name order
    assert_eq!(frame.symbols(), &["QQQ".to_string(), "VTI".to_string()]);
    // only 01-02 and 01-03 are shared
    assert_eq!(frame.dates(), &[date(2024, 1, 2), date(2024, 1, 3)]);
    assert_eq!(frame.row(1), &[404.0, 101.0]);

    let returns = frame.returns(ReturnKind::Simple);
    assert_eq!(returns.n_obs(), 1);
    assert!((returns.row(0)[0] - 0.01).abs() < 1e-12);
}

#[test]
fn test_benchmark_file() {
    let dir = fixture();
    let spy = CsvFile::new(dir.path().join("SPY_HistoricalData.csv"))
        .read()
        .unwrap();
    assert_eq!(spy.symbol, "SPY");
    assert_eq!(spy.points, vec![(date(2024, 1, 2), 470.0), (date(2024, 1, 3), 475.0)]);
}

#[test]
fn test_missing_close_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "BAD_Data.csv", "Date,Open\n2024-01-02,1\n");

    let err = CsvDirectory::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, DataError::MissingColumn { column: "Close", .. }));
    assert!(err.to_string().contains("BAD_Data.csv"));
}

#[test]
fn test_bad_date_reports_line() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "X_Data.csv", "Date,Close\n2024-01-02,1\nyesterday,2\n");

    let err = CsvFile::new(dir.path().join("X_Data.csv")).read().unwrap_err();
    assert!(matches!(err, DataError::Parse { line: 3, .. }), "{err}");
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        CsvDirectory::new(dir.path()).load(),
        Err(DataError::NoPriceFiles(_))
    ));
}

#[test]
fn test_header_only_file_is_dropped() {
    let dir = fixture();
    write(dir.path(), "CCC_HistoricalData.csv", "Date,Close\n");

    let series = CsvDirectory::new(dir.path()).excluding("SPY").load().unwrap();
    assert_eq!(series.len(), 2);
    assert!(series.iter().all(|s| s.symbol != "CCC"));

    // the remaining assets keep their shared dates
    let frame = CsvDirectory::new(dir.path()).excluding("SPY").frame().unwrap();
    assert_eq!(frame.symbols(), &["QQQ".to_string(), "VTI".to_string()]);
    assert_eq!(frame.n_rows(), 2);
}
