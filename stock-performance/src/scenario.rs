use crate::{
    FnvIndexMap,
    config::{Config, ExpectedStatistics, ScenarioConfig, Tolerance},
    data::{
        ReturnDataset, SecurityId,
        loader::{SecurityReturnsFilter, load_benchmark_returns, load_security_returns},
    },
    error::PerformanceError,
    statistic::{
        summary::StockPerformance,
        time::{Annual252, Annual365, Daily, Frequency, Monthly, TimeInterval},
    },
};
use derive_more::Display;
use prettytable::Table;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::{info, warn};

/// Statistic method exercised by a self-test scenario.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Display)]
pub enum Method {
    #[display("Total Return")]
    TotalReturn,
    #[display("CAGR")]
    Cagr,
    #[display("Alpha")]
    Alpha,
    #[display("Beta")]
    Beta,
    #[display("Sharpe Ratio")]
    SharpeRatio,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::TotalReturn,
        Method::Cagr,
        Method::Alpha,
        Method::Beta,
        Method::SharpeRatio,
    ];
}

/// Pass/fail result of one [`Method`], with the reasons for any failure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MethodOutcome {
    pub method: Method,
    pub failures: Vec<String>,
}

impl MethodOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of running every [`Method`] of one [`ScenarioConfig`].
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: SmolStr,
    pub outcomes: Vec<MethodOutcome>,
    /// Rendered statistics table, present when every statistic could be calculated.
    pub summary: Option<Table>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(MethodOutcome::passed)
    }

    pub fn outcome(&self, method: Method) -> Option<&MethodOutcome> {
        self.outcomes.iter().find(|outcome| outcome.method == method)
    }

    /// Pass/fail lines, eg/ "scenario_one: Beta Test Failed".
    pub fn lines(&self) -> Vec<String> {
        if self.passed() {
            return vec![format!("{}: All Tests Passed!", self.name)];
        }

        self.outcomes
            .iter()
            .filter(|outcome| !outcome.passed())
            .map(|outcome| format!("{}: {} Test Failed", self.name, outcome.method))
            .collect()
    }

    /// Log the outcome of every [`Method`] and print the summary table & pass/fail lines.
    pub fn print(&self) {
        for outcome in &self.outcomes {
            if outcome.passed() {
                info!(scenario = %self.name, method = %outcome.method, "test passed");
            } else {
                for failure in &outcome.failures {
                    warn!(scenario = %self.name, method = %outcome.method, %failure, "test failed");
                }
            }
        }

        if let Some(summary) = &self.summary {
            println!();
            summary.printstd();
        }

        for line in self.lines() {
            println!("{line}");
        }
    }
}

/// Run a [`ScenarioConfig`] using the returns frequency selected by the [`Config`].
///
/// Errors (eg/ unreadable data, degenerate statistics) are reported as failed methods.
pub fn run_scenario(config: &Config, scenario: &ScenarioConfig) -> ScenarioReport {
    match config.frequency {
        Frequency::Daily => run_scenario_with(config, scenario, Daily, Annual252),
        Frequency::Monthly => run_scenario_with(config, scenario, Monthly, Annual365),
    }
}

/// Run every [`ScenarioConfig`] of the [`Config`].
pub fn run_all(config: &Config) -> Vec<ScenarioReport> {
    config
        .scenarios
        .iter()
        .map(|scenario| run_scenario(config, scenario))
        .collect()
}

/// Load the [`ReturnDataset`] a [`ScenarioConfig`] covers.
pub fn load_dataset(
    config: &Config,
    scenario: &ScenarioConfig,
) -> Result<ReturnDataset, PerformanceError> {
    let range = scenario.range();
    let tickers = scenario.tickers();

    let securities = load_security_returns(
        &config.data.security_returns_file,
        &SecurityReturnsFilter {
            tickers: &tickers,
            range,
            in_percent: config.data.security_returns_in_percent,
        },
    )?;
    let benchmark =
        load_benchmark_returns(&config.data.benchmark_returns_file, &config.data.benchmark, range)?;

    Ok(ReturnDataset::from_series(
        securities.values(),
        &benchmark,
        range,
    ))
}

/// Run a [`ScenarioConfig`] against an already loaded [`ReturnDataset`].
pub fn run_scenario_on<Interval, Annual>(
    config: &Config,
    scenario: &ScenarioConfig,
    dataset: ReturnDataset,
    interval: Interval,
    annual: Annual,
) -> ScenarioReport
where
    Interval: TimeInterval,
    Annual: TimeInterval,
{
    let performance = match StockPerformance::new(
        dataset,
        config.risk_free_return,
        config.day_count,
        interval,
    ) {
        Ok(performance) => performance,
        Err(error) => return failed_scenario(scenario, &error),
    };

    let tolerance = config.tolerance;
    let expected = &scenario.expected;

    let outcomes = vec![
        check(
            Method::TotalReturn,
            performance.total_returns(),
            expected,
            tolerance,
            |total_return| total_return.value,
            |expected| expected.total_return,
        ),
        check(
            Method::Cagr,
            performance.cagrs(),
            expected,
            tolerance,
            |cagr| cagr.value,
            |expected| expected.cagr,
        ),
        check(
            Method::Alpha,
            performance.alphas(),
            expected,
            tolerance,
            |alpha| alpha.value,
            |expected| expected.alpha,
        ),
        check(
            Method::Beta,
            performance.betas(),
            expected,
            tolerance,
            |beta| beta.value,
            |expected| expected.beta,
        ),
        check(
            Method::SharpeRatio,
            performance.sharpe_ratios(),
            expected,
            tolerance,
            |sharpe| sharpe.clone().scale(annual).value,
            |expected| expected.sharpe_ratio,
        ),
    ];

    let summary = match performance.report() {
        Ok(report) => Some(report.table(annual)),
        Err(error) => {
            warn!(scenario = %scenario.name, %error, "failed to generate performance report");
            None
        }
    };

    ScenarioReport {
        name: scenario.name.clone(),
        outcomes,
        summary,
    }
}

fn run_scenario_with<Interval, Annual>(
    config: &Config,
    scenario: &ScenarioConfig,
    interval: Interval,
    annual: Annual,
) -> ScenarioReport
where
    Interval: TimeInterval,
    Annual: TimeInterval,
{
    info!(
        scenario = %scenario.name,
        start = %scenario.start,
        end = %scenario.end,
        interval = %interval.name(),
        "running scenario"
    );

    match load_dataset(config, scenario) {
        Ok(dataset) => run_scenario_on(config, scenario, dataset, interval, annual),
        Err(error) => failed_scenario(scenario, &error),
    }
}

fn failed_scenario(scenario: &ScenarioConfig, error: &PerformanceError) -> ScenarioReport {
    ScenarioReport {
        name: scenario.name.clone(),
        outcomes: Method::ALL
            .into_iter()
            .map(|method| MethodOutcome {
                method,
                failures: vec![error.to_string()],
            })
            .collect(),
        summary: None,
    }
}

fn check<T, FnActual, FnExpected>(
    method: Method,
    actual: Result<FnvIndexMap<SecurityId, T>, PerformanceError>,
    expected: &[ExpectedStatistics],
    tolerance: Tolerance,
    actual_value: FnActual,
    expected_value: FnExpected,
) -> MethodOutcome
where
    FnActual: Fn(&T) -> f64,
    FnExpected: Fn(&ExpectedStatistics) -> f64,
{
    let actual = match actual {
        Ok(actual) => actual,
        Err(error) => {
            return MethodOutcome {
                method,
                failures: vec![error.to_string()],
            };
        }
    };

    let failures = expected
        .iter()
        .filter_map(|expected| {
            let Some(statistic) = actual.get(&expected.security) else {
                return Some(format!("{}: no result", expected.security));
            };

            let calculated = actual_value(statistic);
            let target = expected_value(expected);

            (!tolerance.accepts(calculated, target)).then(|| {
                format!(
                    "{}: expected {target}, calculated {calculated}",
                    expected.security
                )
            })
        })
        .collect();

    MethodOutcome { method, failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DataConfig,
        data::{BenchmarkSeries, DateRange, ReturnObservation, ReturnSeries},
        statistic::time::DayCount,
    };
    use chrono::NaiveDate;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    const DATES: [&str; 4] = ["2019-01-31", "2019-02-28", "2019-03-29", "2019-04-30"];
    const BENCHMARK: [f64; 4] = [0.01, 0.02, 0.03, -0.015];

    fn series(security: &str, values: [f64; 4]) -> ReturnSeries {
        ReturnSeries::new(
            SecurityId::new(security),
            DATES
                .iter()
                .zip(values)
                .map(|(day, value)| ReturnObservation::new(date(day), value))
                .collect(),
        )
        .unwrap()
    }

    fn dataset(security: ReturnSeries) -> ReturnDataset {
        let benchmark = BenchmarkSeries::new(SmolStr::new("INDEX"), series("INDEX", BENCHMARK));
        ReturnDataset::from_series(
            [&security],
            &benchmark,
            DateRange::new(date("2019-01-01"), date("2019-04-30")),
        )
    }

    fn config(scenario: ScenarioConfig) -> Config {
        Config {
            data: DataConfig {
                security_returns_file: "unused.csv".into(),
                security_returns_in_percent: true,
                benchmark_returns_file: "unused.csv".into(),
                benchmark: SmolStr::new("INDEX"),
            },
            risk_free_return: 0.0,
            frequency: Frequency::Monthly,
            // 2019-01-01..2019-04-30 is exactly one 120 day year
            day_count: DayCount {
                days_in_year: 120.0,
            },
            tolerance: Tolerance::default(),
            scenarios: vec![scenario],
        }
    }

    fn scenario(expected: ExpectedStatistics) -> ScenarioConfig {
        ScenarioConfig {
            name: SmolStr::new("unit"),
            start: date("2019-01-01"),
            end: date("2019-04-30"),
            expected: vec![expected],
        }
    }

    fn index_tracker_expectation() -> ExpectedStatistics {
        // Security identical to the benchmark:
        //   total return = 1.01 * 1.02 * 1.03 * 0.985 - 1 = 0.04518941
        //   alpha = 0, beta = 1
        let mean = BENCHMARK.iter().sum::<f64>() / 4.0;
        let variance = BENCHMARK
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / 4.0;

        ExpectedStatistics {
            security: SecurityId::new("TRACK-US"),
            total_return: 0.04518941,
            cagr: 0.04518941,
            alpha: 0.0,
            beta: 1.0,
            sharpe_ratio: mean / variance.sqrt() * 12.0_f64.sqrt(),
        }
    }

    #[test]
    fn test_run_scenario_on_all_pass() {
        let scenario = scenario(index_tracker_expectation());
        let config = config(scenario.clone());

        let report = run_scenario_on(
            &config,
            &scenario,
            dataset(series("TRACK-US", BENCHMARK)),
            Monthly,
            Annual365,
        );

        assert!(report.passed(), "{:?}", report.outcomes);
        assert_eq!(report.outcomes.len(), 5);
        assert!(report.summary.is_some());
        assert_eq!(report.lines(), vec!["unit: All Tests Passed!".to_string()]);
    }

    #[test]
    fn test_run_scenario_on_reports_failed_method() {
        let mut expected = index_tracker_expectation();
        expected.beta = 1.5;
        let scenario = scenario(expected);
        let config = config(scenario.clone());

        let report = run_scenario_on(
            &config,
            &scenario,
            dataset(series("TRACK-US", BENCHMARK)),
            Monthly,
            Annual365,
        );

        assert!(!report.passed());
        assert!(!report.outcome(Method::Beta).unwrap().passed());
        assert!(report.outcome(Method::Alpha).unwrap().passed());
        assert_eq!(report.lines(), vec!["unit: Beta Test Failed".to_string()]);
    }

    #[test]
    fn test_run_scenario_on_reports_calculation_errors() {
        // Constant returns: zero variance for the Sharpe Ratio only
        let scenario = scenario(ExpectedStatistics {
            security: SecurityId::new("FLAT-US"),
            total_return: 1.01_f64.powi(4) - 1.0,
            cagr: 1.01_f64.powi(4) - 1.0,
            alpha: 0.01,
            beta: 0.0,
            sharpe_ratio: 0.0,
        });
        let config = config(scenario.clone());

        let report = run_scenario_on(
            &config,
            &scenario,
            dataset(series("FLAT-US", [0.01; 4])),
            Monthly,
            Annual365,
        );

        let sharpe = report.outcome(Method::SharpeRatio).unwrap();
        assert_eq!(sharpe.failures, vec![PerformanceError::ZeroVariance.to_string()]);
        assert!(report.outcome(Method::TotalReturn).unwrap().passed());
        assert!(report.outcome(Method::Beta).unwrap().passed());
        assert!(report.summary.is_none());
        assert_eq!(report.lines(), vec!["unit: Sharpe Ratio Test Failed".to_string()]);
    }

    #[test]
    fn test_run_scenario_with_missing_files_fails_every_method() {
        let scenario = scenario(index_tracker_expectation());
        let mut config = config(scenario.clone());
        config.data.security_returns_file = "/nonexistent/security_returns.csv".into();

        let report = run_scenario(&config, &scenario);

        assert_eq!(report.outcomes.len(), Method::ALL.len());
        assert!(report.outcomes.iter().all(|outcome| !outcome.passed()));
        assert_eq!(report.lines().len(), 5);
    }
}
