//! Command pipelines
//!
//! Each command loads the market, runs the core computations, writes chart
//! data and the text report into the output directory, and returns the
//! report so the caller can echo it.

use std::fmt::Display;
use std::path::Path;

use color_eyre::eyre::{WrapErr, bail};
use mcport_core::aggregate::{failure_rate, histogram, horizon_ranges, percentile_table, summarize};
use mcport_core::comparison::{
    benchmark_growth, cumulative_growth, cumulative_returns, cumulative_weighted_returns,
    portfolio_growth, rolling_mean, total_return_pct,
};
use mcport_core::data::{CsvDirectory, CsvFile, PriceSource, SyntheticSource};
use mcport_core::model::{
    DatedSeries, Outcome, PriceFrame, PriceSeries, ReturnKind, ReturnSeries, Unavailable, Weights,
};
use mcport_core::momentum::momentum_parameters;
use mcport_core::simulation::{
    DiscreteRun, DriftConvention, HorizonSimulation, LogGbmSimulation, run_discrete,
    simulate_horizon_returns, simulate_log_gbm,
};
use mcport_core::stats::{annualize, estimate, max_drawdown, mean, sample_std};
use mcport_core::ProjectionSettings;
use serde::Serialize;

use crate::cli::Command;
use crate::export;
use crate::report::{
    HistoricalSummary, ProjectionReport, ProjectionSection, SimulationReport, StatsReport,
};
use crate::settings::{DataSettings, OutputSettings, RunSettings};
use crate::util::io::{atomic_write, ensure_dir};

/// Portfolio assets plus the benchmark, when one could be found
#[derive(Debug, Clone)]
pub struct Market {
    pub assets: PriceFrame,
    pub benchmark: Outcome<PriceSeries>,
}

/// Load prices from the CSV directory, or generate the synthetic market.
pub fn load_market(data: &DataSettings) -> color_eyre::Result<Market> {
    let market = match &data.dir {
        Some(dir) => load_csv_market(dir, data)?,
        None => load_synthetic_market(data)?,
    };
    if market.assets.n_assets() == 0 {
        bail!("no portfolio assets remain after excluding {}", data.benchmark);
    }
    if let Outcome::Unavailable(reason) = &market.benchmark {
        tracing::warn!(%reason, "benchmark comparison skipped");
    }
    tracing::info!(
        assets = market.assets.n_assets(),
        rows = market.assets.n_rows(),
        "market loaded"
    );
    Ok(market)
}

fn load_csv_market(dir: &Path, data: &DataSettings) -> color_eyre::Result<Market> {
    let assets = CsvDirectory::new(dir)
        .excluding(&data.benchmark)
        .frame()
        .wrap_err_with(|| format!("loading price files from {}", dir.display()))?;

    let benchmark_path = match &data.benchmark_file {
        Some(path) => Some(path.clone()),
        None => CsvDirectory::new(dir).files()?.into_iter().find(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(&data.benchmark))
        }),
    };

    let benchmark = match benchmark_path {
        Some(path) => {
            let file = CsvFile {
                path,
                symbol: data.benchmark.clone(),
            };
            let series = file
                .read()
                .wrap_err_with(|| format!("loading benchmark {}", file.path.display()))?;
            if series.is_empty() {
                Outcome::Unavailable(Unavailable::MissingSymbol(data.benchmark.clone()))
            } else {
                Outcome::Computed(series)
            }
        }
        None => Outcome::Unavailable(Unavailable::MissingSymbol(data.benchmark.clone())),
    };

    Ok(Market { assets, benchmark })
}

fn load_synthetic_market(data: &DataSettings) -> color_eyre::Result<Market> {
    let synthetic = &data.synthetic;
    let asset_symbols: Vec<&String> = synthetic
        .symbols
        .iter()
        .filter(|s| **s != data.benchmark)
        .collect();

    let mut symbols: Vec<String> = asset_symbols.iter().map(|s| s.to_string()).collect();
    symbols.push(data.benchmark.clone());

    let frame = SyntheticSource::new(symbols, synthetic.start, synthetic.end, synthetic.seed)
        .frame()
        .wrap_err("generating synthetic prices")?;
    tracing::debug!(seed = synthetic.seed, rows = frame.n_rows(), "synthetic market generated");

    let assets = frame.select(&asset_symbols)?;
    let benchmark = match frame.price_series(&data.benchmark) {
        Some(series) => Outcome::Computed(series),
        None => Outcome::Unavailable(Unavailable::MissingSymbol(data.benchmark.clone())),
    };
    Ok(Market { assets, benchmark })
}

/// Write `{name}.txt` (and `{name}.json` when enabled); returns the text.
fn write_report<R: Display + Serialize>(
    report: &R,
    output: &OutputSettings,
    name: &str,
) -> color_eyre::Result<String> {
    let text = report.to_string();
    let path = output.dir.join(format!("{name}.txt"));
    atomic_write(&path, &text).wrap_err_with(|| format!("writing {}", path.display()))?;

    if output.json {
        let json_path = output.dir.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(report).wrap_err("serializing report")?;
        atomic_write(&json_path, json)
            .wrap_err_with(|| format!("writing {}", json_path.display()))?;
    }

    tracing::info!(path = %path.display(), "report written");
    Ok(text)
}

/// Export a chart file only when its data was computed.
fn export_if<T>(
    outcome: &Outcome<T>,
    what: &str,
    write: impl FnOnce(&T) -> color_eyre::Result<()>,
) -> color_eyre::Result<()> {
    match outcome {
        Outcome::Computed(value) => write(value),
        Outcome::Unavailable(reason) => {
            tracing::warn!(%reason, "skipping {what} export");
            Ok(())
        }
    }
}

/// Last value of a cumulative-summed return series, in percent.
fn last_value_pct(series: &DatedSeries) -> Outcome<f64> {
    match series.last() {
        Some(v) => Outcome::Computed(v * 100.0),
        None => Outcome::Unavailable(Unavailable::EmptySeries {
            what: series.label.clone(),
        }),
    }
}

fn historical_series(parts: &[&Outcome<DatedSeries>]) -> Vec<DatedSeries> {
    parts
        .iter()
        .filter_map(|part| match part {
            Outcome::Computed(series) => Some(series.clone()),
            Outcome::Unavailable(_) => None,
        })
        .collect()
}

/// Discrete GBM run: estimate, simulate, failure rate and benchmark comparison.
pub fn run_simulate(settings: &RunSettings) -> color_eyre::Result<SimulationReport> {
    let market = load_market(&settings.data)?;
    let out = &settings.output;
    ensure_dir(&out.dir).wrap_err("creating output directory")?;
    let d = &settings.discrete;

    let returns = market.assets.returns(ReturnKind::Simple);
    let weights = settings.weights.resolve(returns.n_assets(), d.seed)?;
    tracing::info!(weights = ?weights.as_slice(), "portfolio weights");

    let DiscreteRun {
        statistics: stats,
        ensemble,
    } = run_discrete(&returns, weights.clone(), d).wrap_err("running discrete simulation")?;
    tracing::info!(paths = ensemble.n_paths(), steps = ensemble.steps(), "simulation complete");

    let failure = failure_rate(&ensemble, d.initial_value, d.expected_gain);
    let summary = summarize(&ensemble, &d.percentiles);

    let portfolio_cumulative = cumulative_weighted_returns(&returns, &weights);
    let benchmark_cumulative = market.benchmark.as_ref().and_then(cumulative_returns);

    export::write_ensemble_sample(
        &out.dir.join("simulation_paths.csv"),
        &ensemble,
        out.sample_paths,
    )?;
    export_if(
        &histogram(&ensemble.final_values(), out.histogram_bins),
        "final value histogram",
        |h| export::write_histogram(&out.dir.join("final_values_histogram.csv"), h),
    )?;
    export::write_series(
        &out.dir.join("cumulative_returns.csv"),
        &historical_series(&[&portfolio_cumulative, &benchmark_cumulative]),
    )?;

    let report = SimulationReport {
        settings: d.clone(),
        symbols: stats.symbols.clone(),
        weights: weights.as_slice().to_vec(),
        failure_rate: failure,
        summary,
        portfolio: stats.portfolio_statistics(),
        max_drawdown: max_drawdown(&market.assets),
        correlation: stats.correlation(),
        historical: HistoricalSummary {
            benchmark: settings.data.benchmark.clone(),
            portfolio_return: portfolio_cumulative.and_then(|s| last_value_pct(&s)),
            benchmark_return: benchmark_cumulative.and_then(|s| last_value_pct(&s)),
        },
    };
    write_report(&report, out, "simulation_results")?;
    Ok(report)
}

fn drift_convention(settings: &ProjectionSettings) -> DriftConvention {
    if settings.ito_correction {
        DriftConvention::ItoCorrected
    } else {
        DriftConvention::Raw
    }
}

/// Log-GBM projection and its percentile tables for one `(mean, volatility)` pair.
fn projection(
    annual_mean: f64,
    annual_volatility: f64,
    settings: &ProjectionSettings,
) -> color_eyre::Result<Outcome<ProjectionSection>> {
    let simulation = LogGbmSimulation::from_settings(annual_mean, annual_volatility, settings);
    let ensemble = simulate_log_gbm(&simulation).wrap_err("running log-GBM projection")?;
    Ok(
        percentile_table(&ensemble, &settings.markers(), &settings.percentiles).map(|values| {
            ProjectionSection {
                annual_mean,
                annual_volatility,
                returns: values.as_returns(settings.initial_value),
                values,
            }
        }),
    )
}

/// Equal-weighted portfolio parameters from the cross-sectional mean return.
fn baseline_parameters(returns: &ReturnSeries) -> Outcome<(f64, f64)> {
    if returns.is_empty() {
        return Outcome::Unavailable(Unavailable::EmptySeries {
            what: "portfolio returns".to_string(),
        });
    }
    let portfolio = returns.row_means();
    Outcome::Computed(annualize(mean(&portfolio), sample_std(&portfolio)))
}

fn project_with(
    parameters: Outcome<(f64, f64)>,
    settings: &ProjectionSettings,
) -> color_eyre::Result<Outcome<ProjectionSection>> {
    match parameters {
        Outcome::Computed((m, v)) => projection(m, v, settings),
        Outcome::Unavailable(reason) => Ok(Outcome::Unavailable(reason)),
    }
}

/// Multi-year projections, momentum variant, horizon ranges and history.
pub fn run_project(settings: &RunSettings) -> color_eyre::Result<ProjectionReport> {
    let market = load_market(&settings.data)?;
    let out = &settings.output;
    ensure_dir(&out.dir).wrap_err("creating output directory")?;
    let p = &settings.projection;

    let simple = market.assets.returns(ReturnKind::Simple);
    let stats = estimate(&simple).wrap_err("estimating return statistics")?;
    let weights = Weights::equal(stats.symbols.len())?;

    // Per-asset growth with moving averages
    let mut asset_growth = Vec::new();
    for series in cumulative_growth(&simple) {
        for &window in &out.moving_average_windows {
            if let Outcome::Computed(ma) = rolling_mean(&series, window) {
                asset_growth.push(ma);
            }
        }
        asset_growth.push(series);
    }
    export::write_series(&out.dir.join("asset_growth.csv"), &asset_growth)?;

    // Portfolio vs. benchmark
    let portfolio = portfolio_growth(&market.assets, &weights);
    let benchmark = market.benchmark.as_ref().and_then(benchmark_growth);
    export::write_series(
        &out.dir.join("historical_growth.csv"),
        &historical_series(&[&portfolio, &benchmark]),
    )?;
    let historical = HistoricalSummary {
        benchmark: settings.data.benchmark.clone(),
        portfolio_return: portfolio.and_then(|s| total_return_pct(&s)),
        benchmark_return: benchmark.and_then(|s| total_return_pct(&s)),
    };

    // Per-asset horizon ranges from log-return statistics
    let log_stats = estimate(&market.assets.returns(ReturnKind::Log))
        .wrap_err("estimating log-return statistics")?;
    let (annual_means, annual_volatilities) = log_stats
        .mean
        .iter()
        .zip(log_stats.std_devs())
        .map(|(&m, s)| annualize(m, s))
        .unzip();
    let horizon_returns = simulate_horizon_returns(&HorizonSimulation {
        annual_means,
        annual_volatilities,
        weights,
        horizons_years: p.horizon_years.clone(),
        num_paths: p.num_paths,
        seed: p.seed,
        drift: drift_convention(p),
    })
    .wrap_err("running horizon simulation")?;
    let ranges = horizon_ranges(&horizon_returns);
    export::write_return_ranges(&out.dir.join("horizon_ranges.csv"), &ranges)?;
    if let Some(longest) = horizon_returns.iter().max_by_key(|h| h.years) {
        export_if(
            &histogram(&longest.returns, out.histogram_bins),
            "horizon return histogram",
            |h| export::write_histogram(&out.dir.join("horizon_returns_histogram.csv"), h),
        )?;
    }

    // Baseline and momentum projections
    let baseline = project_with(baseline_parameters(&simple), p)?;
    let momentum = project_with(momentum_parameters(&simple, p.momentum_lookback), p)?;
    for (section, name) in [(&baseline, "projection_baseline"), (&momentum, "projection_momentum")] {
        export_if(section, name, |s| {
            export::write_percentile_table(&out.dir.join(format!("{name}.csv")), &s.values)
        })?;
    }

    let report = ProjectionReport {
        initial_value: p.initial_value,
        num_paths: p.num_paths,
        symbols: stats.symbols.clone(),
        asset_statistics: stats.asset_statistics(p.risk_free_rate),
        historical,
        horizon_ranges: ranges,
        baseline,
        momentum,
    };
    write_report(&report, out, "projection_results")?;
    Ok(report)
}

/// Descriptive statistics of the loaded history.
pub fn run_stats(settings: &RunSettings) -> color_eyre::Result<StatsReport> {
    let market = load_market(&settings.data)?;
    let out = &settings.output;
    ensure_dir(&out.dir).wrap_err("creating output directory")?;

    let returns = market.assets.returns(ReturnKind::Simple);
    let stats = estimate(&returns).wrap_err("estimating return statistics")?;
    let rf = settings.projection.risk_free_rate;

    let report = StatsReport {
        symbols: stats.symbols.clone(),
        observations: stats.observations,
        first_date: returns.dates().first().copied(),
        last_date: returns.dates().last().copied(),
        risk_free_rate: rf,
        asset_statistics: stats.asset_statistics(rf),
        portfolio: stats.portfolio_statistics(),
        max_drawdown: max_drawdown(&market.assets),
        correlation: stats.correlation(),
    };
    write_report(&report, out, "statistics")?;
    Ok(report)
}

/// Run the selected command and echo its report to stdout.
pub fn run(command: &Command, settings: &RunSettings) -> color_eyre::Result<()> {
    let text = match command {
        Command::Simulate(_) => run_simulate(settings)?.to_string(),
        Command::Project(_) => run_project(settings)?.to_string(),
        Command::Stats(_) => run_stats(settings)?.to_string(),
    };
    println!("{text}");
    Ok(())
}
