use crate::{
    FnvIndexMap,
    data::{AlignedReturns, DateRange, ReturnDataset, SecurityId},
    error::PerformanceError,
    statistic::{
        metric::{
            cagr::Cagr,
            capm::{Alpha, Beta, CapmRegression},
            sharpe::SharpeRatio,
            total_return::TotalReturn,
        },
        time::{DayCount, TimeInterval},
    },
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

pub mod display;

/// Calculates performance statistics for every security in a [`ReturnDataset`].
///
/// Each statistic is computed from the security's returns aligned with the benchmark, so
/// security observations without a benchmark observation on the same date are excluded from
/// every statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct StockPerformance<Interval> {
    dataset: ReturnDataset,
    /// Constant per-period risk-free rate of return, subtracted from security & benchmark returns.
    ///
    /// See docs: <https://www.investopedia.com/terms/r/risk-freerate.asp>
    risk_free_return: f64,
    years: f64,
    interval: Interval,
}

impl<Interval> StockPerformance<Interval>
where
    Interval: TimeInterval,
{
    /// Construct a [`StockPerformance`] calculator for returns sampled every `interval`.
    ///
    /// The CAGR time span is the dataset [`DateRange`] measured with the [`DayCount`].
    pub fn new(
        dataset: ReturnDataset,
        risk_free_return: f64,
        day_count: DayCount,
        interval: Interval,
    ) -> Result<Self, PerformanceError> {
        if !risk_free_return.is_finite() {
            return Err(PerformanceError::InvalidObservation(format!(
                "risk free return must be finite, found {risk_free_return}"
            )));
        }

        let years = day_count.years(&dataset.range)?;

        Ok(Self {
            dataset,
            risk_free_return,
            years,
            interval,
        })
    }

    pub fn years(&self) -> f64 {
        self.years
    }

    pub fn total_returns(&self) -> Result<FnvIndexMap<SecurityId, TotalReturn>, PerformanceError> {
        self.per_security(|returns| {
            TotalReturn::calculate(returns.security_returns.iter().copied())
        })
    }

    pub fn cagrs(&self) -> Result<FnvIndexMap<SecurityId, Cagr>, PerformanceError> {
        self.per_security(|returns| {
            Cagr::from_returns(returns.security_returns.iter().copied(), self.years)
        })
    }

    /// Shared [`CapmRegression`] of each security against the benchmark.
    pub fn capm_regressions(
        &self,
    ) -> Result<FnvIndexMap<SecurityId, CapmRegression>, PerformanceError> {
        self.per_security(|returns| {
            CapmRegression::calculate(
                &returns.security_returns,
                &returns.benchmark_returns,
                self.risk_free_return,
            )
        })
    }

    pub fn alphas(&self) -> Result<FnvIndexMap<SecurityId, Alpha<Interval>>, PerformanceError> {
        self.per_security(|returns| {
            Alpha::calculate(
                &returns.security_returns,
                &returns.benchmark_returns,
                self.risk_free_return,
                self.interval,
            )
        })
    }

    pub fn betas(&self) -> Result<FnvIndexMap<SecurityId, Beta>, PerformanceError> {
        self.per_security(|returns| {
            Beta::calculate(
                &returns.security_returns,
                &returns.benchmark_returns,
                self.risk_free_return,
            )
        })
    }

    pub fn sharpe_ratios(
        &self,
    ) -> Result<FnvIndexMap<SecurityId, SharpeRatio<Interval>>, PerformanceError> {
        self.per_security(|returns| {
            SharpeRatio::from_returns(
                returns.security_returns.iter().copied(),
                self.risk_free_return,
                self.interval,
            )
        })
    }

    /// Generate a [`PerformanceSummary`] for every security, failing on the first statistic that
    /// cannot be calculated.
    pub fn report(&self) -> Result<PerformanceReport<Interval>, PerformanceError> {
        let securities = self.per_security(|returns| self.summarise(returns))?;

        Ok(PerformanceReport {
            benchmark: self.dataset.benchmark.clone(),
            range: self.dataset.range,
            risk_free_return: self.risk_free_return,
            securities,
        })
    }

    fn summarise(
        &self,
        returns: &AlignedReturns,
    ) -> Result<PerformanceSummary<Interval>, PerformanceError> {
        let total_return = TotalReturn::calculate(returns.security_returns.iter().copied())?;
        let cagr = Cagr::calculate(total_return.value, self.years)?;
        let regression = CapmRegression::calculate(
            &returns.security_returns,
            &returns.benchmark_returns,
            self.risk_free_return,
        )?;
        let sharpe_ratio = SharpeRatio::from_returns(
            returns.security_returns.iter().copied(),
            self.risk_free_return,
            self.interval,
        )?;

        Ok(PerformanceSummary {
            security: returns.security.clone(),
            observations: returns.len(),
            total_return,
            cagr,
            alpha: Alpha::from_regression(&regression, self.interval),
            beta: Beta::from_regression(&regression),
            sharpe_ratio,
        })
    }

    fn per_security<T, F>(
        &self,
        calculate: F,
    ) -> Result<FnvIndexMap<SecurityId, T>, PerformanceError>
    where
        F: Fn(&AlignedReturns) -> Result<T, PerformanceError>,
    {
        self.dataset
            .securities
            .iter()
            .map(|(security, returns)| {
                debug!(%security, observations = returns.len(), "calculating statistic");
                calculate(returns).map(|value| (security.clone(), value))
            })
            .collect()
    }
}

/// Performance statistics of one security, with per-period Alpha & Sharpe Ratio.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PerformanceSummary<Interval> {
    pub security: SecurityId,
    pub observations: usize,
    pub total_return: TotalReturn,
    pub cagr: Cagr,
    pub alpha: Alpha<Interval>,
    pub beta: Beta,
    pub sharpe_ratio: SharpeRatio<Interval>,
}

/// [`PerformanceSummary`] of every security measured against one benchmark.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PerformanceReport<Interval> {
    pub benchmark: SmolStr,
    pub range: DateRange,
    pub risk_free_return: f64,
    pub securities: FnvIndexMap<SecurityId, PerformanceSummary<Interval>>,
}
