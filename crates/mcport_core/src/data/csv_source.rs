use std::path::{Path, PathBuf};

use jiff::civil::Date;

use super::PriceSource;
use crate::error::DataError;
use crate::model::PriceSeries;

const DATE_COLUMN: &str = "Date";
const CLOSE_COLUMNS: [&str; 2] = ["Close", "Close/Last"];

/// Parse `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    raw.parse::<Date>()
        .ok()
        .or_else(|| Date::strptime("%m/%d/%Y", raw).ok())
}

/// Parse a price, tolerating a leading `$` and thousands separators.
///
/// Empty cells are `Ok(None)`.
pub fn parse_price(raw: &str) -> Result<Option<f64>, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid price '{raw}': {e}"))
}

/// Read one `Date` + `Close` (or `Close/Last`) CSV into a series.
///
/// Rows come back sorted by date; empty price cells are skipped.
pub fn read_price_csv(path: &Path, symbol: &str) -> Result<PriceSeries, DataError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::Parse {
            path: path.to_path_buf(),
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let date_idx = find(DATE_COLUMN).ok_or_else(|| DataError::MissingColumn {
        path: path.to_path_buf(),
        column: DATE_COLUMN,
    })?;
    let close_idx = CLOSE_COLUMNS
        .iter()
        .find_map(|&c| find(c))
        .ok_or_else(|| DataError::MissingColumn {
            path: path.to_path_buf(),
            column: CLOSE_COLUMNS[0],
        })?;

    let mut points = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::Parse {
            path: path.to_path_buf(),
            line: e.position().map_or(0, |p| p.line()),
            message: e.to_string(),
        })?;
        let line = record.position().map_or(0, |p| p.line());
        let parse_err = |message: String| DataError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date =
            parse_date(raw_date).ok_or_else(|| parse_err(format!("invalid date '{raw_date}'")))?;
        if let Some(price) = parse_price(record.get(close_idx).unwrap_or_default()).map_err(parse_err)? {
            points.push((date, price));
        }
    }

    points.sort_by_key(|(d, _)| *d);
    tracing::debug!(symbol, rows = points.len(), path = %path.display(), "read price file");
    Ok(PriceSeries::new(symbol, points))
}

/// Symbol for a price file: the file name up to the first `_`.
fn symbol_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    stem.split('_').next().map(str::to_string)
}

/// Directory of per-asset CSV files
///
/// Files whose name contains the exclusion tag (the benchmark) are skipped.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    pub dir: PathBuf,
    pub exclude: Option<String>,
}

impl CsvDirectory {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            exclude: None,
        }
    }

    #[must_use]
    pub fn excluding(mut self, tag: impl Into<String>) -> Self {
        self.exclude = Some(tag.into());
        self
    }

    /// Matching files, sorted by name.
    pub fn files(&self) -> Result<Vec<PathBuf>, DataError> {
        let io_err = |e: std::io::Error| DataError::Io {
            path: self.dir.clone(),
            message: e.to_string(),
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let excluded = self
                .exclude
                .as_deref()
                .is_some_and(|tag| name.contains(tag));
            if path.is_file() && is_csv && !excluded {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl PriceSource for CsvDirectory {
    fn load(&self) -> Result<Vec<PriceSeries>, DataError> {
        let files = self.files()?;
        if files.is_empty() {
            return Err(DataError::NoPriceFiles(self.dir.clone()));
        }

        let series = files
            .iter()
            .filter_map(|path| symbol_for(path).map(|symbol| (path, symbol)))
            .map(|(path, symbol)| read_price_csv(path, &symbol))
            .collect::<Result<Vec<_>, _>>()?;

        // An empty series would inner-join every date away
        let (series, empty): (Vec<_>, Vec<_>) = series.into_iter().partition(|s| !s.is_empty());
        for s in &empty {
            tracing::warn!(symbol = %s.symbol, "no price rows, asset dropped");
        }

        tracing::info!(assets = series.len(), dir = %self.dir.display(), "loaded price files");
        Ok(series)
    }
}

/// A single price file
#[derive(Debug, Clone)]
pub struct CsvFile {
    pub path: PathBuf,
    pub symbol: String,
}

impl CsvFile {
    /// The symbol defaults to the file-name prefix.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let symbol = symbol_for(&path).unwrap_or_else(|| "BENCHMARK".to_string());
        Self { path, symbol }
    }

    pub fn read(&self) -> Result<PriceSeries, DataError> {
        read_price_csv(&self.path, &self.symbol)
    }
}

impl PriceSource for CsvFile {
    fn load(&self) -> Result<Vec<PriceSeries>, DataError> {
        Ok(vec![self.read()?])
    }
}
