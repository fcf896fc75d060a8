use crate::{
    data::{DateRange, SecurityId},
    error::PerformanceError,
    statistic::time::{DayCount, Frequency},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top level configuration: input files, calculation conventions & self-test scenarios.
///
/// Relative file paths are resolved against the directory containing the config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub data: DataConfig,

    /// Constant per-period risk-free rate of return (eg/ 0.0015 per month).
    pub risk_free_return: f64,

    #[serde(default)]
    pub frequency: Frequency,

    #[serde(default)]
    pub day_count: DayCount,

    #[serde(default)]
    pub tolerance: Tolerance,

    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
}

/// Security & benchmark return files.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DataConfig {
    /// CSV file with `date,ticker,return` rows.
    pub security_returns_file: PathBuf,

    /// Security returns are stated in percent and must be divided by 100.
    #[serde(default = "default_in_percent")]
    pub security_returns_in_percent: bool,

    /// CSV file with `date,benchmark,bench_return` rows, returns stated as fractions.
    pub benchmark_returns_file: PathBuf,

    /// Name of the benchmark in the benchmark file (eg/ "SP500-TR").
    pub benchmark: SmolStr,
}

fn default_in_percent() -> bool {
    true
}

/// Acceptance bounds for comparing a calculated statistic with its expected value.
///
/// A value passes when `|actual - expected| <= max(absolute, relative * |expected|)`.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct Tolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            absolute: 1e-6,
            relative: 1e-6,
        }
    }
}

impl Tolerance {
    pub fn accepts(&self, actual: f64, expected: f64) -> bool {
        let bound = self.absolute.max(self.relative * expected.abs());
        (actual - expected).abs() <= bound
    }
}

/// A canned self-test: securities over a date range with precomputed expected statistics.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub name: SmolStr,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub expected: Vec<ExpectedStatistics>,
}

impl ScenarioConfig {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    /// Securities in the order their expected statistics are listed.
    pub fn tickers(&self) -> Vec<SecurityId> {
        self.expected
            .iter()
            .map(|expected| expected.security.clone())
            .collect()
    }
}

/// Expected statistics of one security. Alpha is per period, Sharpe Ratio is annualised.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExpectedStatistics {
    pub security: SecurityId,
    pub total_return: f64,
    pub cagr: f64,
    pub alpha: f64,
    pub beta: f64,
    pub sharpe_ratio: f64,
}

impl Config {
    /// Load a JSON [`Config`] from the provided path.
    pub fn load<P>(path: P) -> Result<Self, PerformanceError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&contents)?;

        if let Some(base) = path.parent() {
            config.data.resolve_relative_to(base);
        }

        Ok(config)
    }

    /// Parse & validate a JSON [`Config`]. File paths are left as written.
    pub fn from_json(contents: &str) -> Result<Self, PerformanceError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), PerformanceError> {
        if !self.risk_free_return.is_finite() {
            return Err(PerformanceError::Config(format!(
                "risk_free_return must be finite, found {}",
                self.risk_free_return
            )));
        }

        if let Some(scenario) = self.scenarios.iter().find(|scenario| scenario.end < scenario.start)
        {
            return Err(PerformanceError::Config(format!(
                "scenario {} ends ({}) before it starts ({})",
                scenario.name, scenario.end, scenario.start
            )));
        }

        if let Some(scenario) = self.scenarios.iter().find(|scenario| scenario.expected.is_empty())
        {
            return Err(PerformanceError::Config(format!(
                "scenario {} has no expected statistics",
                scenario.name
            )));
        }

        Ok(())
    }
}

impl DataConfig {
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.security_returns_file,
            &mut self.benchmark_returns_file,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
