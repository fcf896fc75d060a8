use crate::{
    FnvIndexMap,
    data::{BenchmarkSeries, DateRange, ReturnObservation, ReturnSeries, SecurityId},
    error::PerformanceError,
};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::Deserialize;
use smol_str::SmolStr;
use std::{io, path::Path};
use tracing::debug;

/// Row of a security returns file: `date,ticker,return`.
#[derive(Debug, Clone, Deserialize)]
struct SecurityReturnRecord {
    date: NaiveDate,
    ticker: SecurityId,
    #[serde(rename = "return")]
    value: f64,
}

/// Row of a benchmark returns file: `date,benchmark,bench_return`. A blank return is `None`.
#[derive(Debug, Clone, Deserialize)]
struct BenchmarkReturnRecord {
    date: NaiveDate,
    benchmark: SmolStr,
    bench_return: Option<f64>,
}

/// Selects which rows of a security returns file are loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityReturnsFilter<'a> {
    pub tickers: &'a [SecurityId],
    pub range: DateRange,
    /// Returns in the file are stated in percent (eg/ 1.25 == 1.25%) and are divided by 100.
    pub in_percent: bool,
}

/// Load the [`ReturnSeries`] of each requested ticker from a `date,ticker,return` CSV file.
pub fn load_security_returns<P>(
    path: P,
    filter: &SecurityReturnsFilter<'_>,
) -> Result<FnvIndexMap<SecurityId, ReturnSeries>, PerformanceError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!(path = %path.display(), tickers = ?filter.tickers, "loading security returns");
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_path(path)?;

    security_returns_from_csv(reader, filter)
}

/// Load the [`ReturnSeries`] of each requested ticker from any `date,ticker,return` CSV source.
pub fn read_security_returns<R>(
    source: R,
    filter: &SecurityReturnsFilter<'_>,
) -> Result<FnvIndexMap<SecurityId, ReturnSeries>, PerformanceError>
where
    R: io::Read,
{
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    security_returns_from_csv(reader, filter)
}

fn security_returns_from_csv<R>(
    mut reader: csv::Reader<R>,
    filter: &SecurityReturnsFilter<'_>,
) -> Result<FnvIndexMap<SecurityId, ReturnSeries>, PerformanceError>
where
    R: io::Read,
{
    validate_range(&filter.range)?;

    let scale = if filter.in_percent { 100.0 } else { 1.0 };

    let mut observations = filter
        .tickers
        .iter()
        .map(|ticker| (ticker.clone(), Vec::new()))
        .collect::<FnvIndexMap<SecurityId, Vec<ReturnObservation>>>();

    for record in reader.deserialize::<SecurityReturnRecord>() {
        let record = record?;
        if !filter.range.contains(record.date) {
            continue;
        }
        if let Some(ticker_observations) = observations.get_mut(&record.ticker) {
            ticker_observations.push(ReturnObservation::new(record.date, record.value / scale));
        }
    }

    observations
        .into_iter()
        .map(|(ticker, observations)| {
            if observations.is_empty() {
                return Err(PerformanceError::UnknownSecurity(ticker));
            }

            let observations = observations
                .into_iter()
                .sorted_by_key(|obs| obs.date)
                .collect();

            ReturnSeries::new(ticker.clone(), observations).map(|series| (ticker, series))
        })
        .collect()
}

/// Load the named benchmark's returns from a `date,benchmark,bench_return` CSV file.
pub fn load_benchmark_returns<P>(
    path: P,
    benchmark: &str,
    range: DateRange,
) -> Result<BenchmarkSeries, PerformanceError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!(path = %path.display(), benchmark, "loading benchmark returns");
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_path(path)?;

    benchmark_returns_from_csv(reader, benchmark, range)
}

/// Load the named benchmark's returns from any `date,benchmark,bench_return` CSV source.
pub fn read_benchmark_returns<R>(
    source: R,
    benchmark: &str,
    range: DateRange,
) -> Result<BenchmarkSeries, PerformanceError>
where
    R: io::Read,
{
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    benchmark_returns_from_csv(reader, benchmark, range)
}

fn benchmark_returns_from_csv<R>(
    mut reader: csv::Reader<R>,
    benchmark: &str,
    range: DateRange,
) -> Result<BenchmarkSeries, PerformanceError>
where
    R: io::Read,
{
    validate_range(&range)?;

    let mut observations = Vec::new();
    let mut missing = 0_usize;

    for record in reader.deserialize::<BenchmarkReturnRecord>() {
        let record = record?;
        if record.benchmark != benchmark || !range.contains(record.date) {
            continue;
        }
        match record.bench_return {
            Some(value) => observations.push(ReturnObservation::new(record.date, value)),
            None => missing += 1,
        }
    }

    if missing > 0 {
        debug!(benchmark, missing, "dropped benchmark rows with no return");
    }

    if observations.is_empty() {
        return Err(PerformanceError::InvalidObservation(format!(
            "no {benchmark} benchmark returns between {} and {}",
            range.start, range.end
        )));
    }

    let observations = observations
        .into_iter()
        .sorted_by_key(|obs| obs.date)
        .collect();

    let name = SmolStr::new(benchmark);
    let series = ReturnSeries::new(SecurityId::new(name.clone()), observations)?;

    Ok(BenchmarkSeries::new(name, series))
}

fn validate_range(range: &DateRange) -> Result<(), PerformanceError> {
    if range.end < range.start {
        Err(PerformanceError::InvalidTimeSpan(format!(
            "end date {} is before start date {}",
            range.end, range.start
        )))
    } else {
        Ok(())
    }
}
