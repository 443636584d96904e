//! Chart data as CSV
//!
//! Plotting is left to external tools; these files carry everything a chart
//! needs (sample paths, fan-chart percentiles, histograms, dated lines).

use std::path::Path;

use color_eyre::eyre::WrapErr;
use mcport_core::model::{DatedSeries, Ensemble, Histogram, PercentileTable, ReturnRange};

fn writer(path: &Path) -> color_eyre::Result<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path).wrap_err_with(|| format!("writing {}", path.display()))
}

/// The first `max_paths` paths, one column per path and one row per step.
pub fn write_ensemble_sample(
    path: &Path,
    ensemble: &Ensemble,
    max_paths: usize,
) -> color_eyre::Result<()> {
    let n = ensemble.n_paths().min(max_paths);
    let mut w = writer(path)?;

    let header: Vec<String> = std::iter::once("step".to_string())
        .chain((0..n).map(|p| format!("path_{p}")))
        .collect();
    w.write_record(&header)?;

    for step in 0..ensemble.steps() {
        let record: Vec<String> = std::iter::once(step.to_string())
            .chain((0..n).map(|p| ensemble.value(step, p).to_string()))
            .collect();
        w.write_record(&record)?;
    }
    w.flush()?;
    tracing::debug!(path = %path.display(), paths = n, "wrote ensemble sample");
    Ok(())
}

/// One row per marker, one column per percentile (`p10`, `p50`, ...).
pub fn write_percentile_table(path: &Path, table: &PercentileTable) -> color_eyre::Result<()> {
    let mut w = writer(path)?;

    let header: Vec<String> = std::iter::once("year".to_string())
        .chain(table.percentiles.iter().map(|p| format!("p{p}")))
        .collect();
    w.write_record(&header)?;

    for (marker, row) in table.rows() {
        let record: Vec<String> = std::iter::once(marker.to_string())
            .chain(row.iter().map(f64::to_string))
            .collect();
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_histogram(path: &Path, histogram: &Histogram) -> color_eyre::Result<()> {
    let mut w = writer(path)?;
    w.write_record(["bin_start", "bin_end", "count"])?;
    for (edges, count) in histogram.edges.windows(2).zip(&histogram.counts) {
        w.write_record(&[edges[0].to_string(), edges[1].to_string(), count.to_string()])?;
    }
    w.flush()?;
    Ok(())
}

/// Several dated lines in long format: `series,date,value`.
pub fn write_series(path: &Path, series: &[DatedSeries]) -> color_eyre::Result<()> {
    let mut w = writer(path)?;
    w.write_record(["series", "date", "value"])?;
    for s in series {
        for (date, value) in s.iter() {
            w.write_record(&[s.label.clone(), date.to_string(), value.to_string()])?;
        }
    }
    w.flush()?;
    Ok(())
}

pub fn write_return_ranges(path: &Path, ranges: &[ReturnRange]) -> color_eyre::Result<()> {
    let mut w = writer(path)?;
    for range in ranges {
        w.serialize(range)?;
    }
    w.flush()?;
    Ok(())
}
