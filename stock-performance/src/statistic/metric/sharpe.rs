use crate::{
    error::PerformanceError,
    statistic::{algorithm::Moments, time::TimeInterval},
};
use serde::{Deserialize, Serialize};

/// Represents a Sharpe Ratio value over a specific [`TimeInterval`].
///
/// Sharpe Ratio measures the risk-adjusted return of an investment by comparing
/// its excess returns (over risk-free rate) to its standard deviation.
///
/// See docs: <https://www.investopedia.com/articles/07/sharpe_ratio.asp>
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct SharpeRatio<Interval> {
    pub value: f64,
    pub interval: Interval,
}

impl<Interval> SharpeRatio<Interval>
where
    Interval: TimeInterval,
{
    /// Calculate the [`SharpeRatio`] over the provided [`TimeInterval`].
    ///
    /// A zero, negative or non-finite standard deviation has no meaningful ratio and is rejected.
    pub fn calculate(
        risk_free_return: f64,
        mean_return: f64,
        std_dev_returns: f64,
        returns_period: Interval,
    ) -> Result<Self, PerformanceError> {
        if std_dev_returns <= 0.0 || !std_dev_returns.is_finite() {
            return Err(PerformanceError::ZeroVariance);
        }

        Ok(Self {
            value: (mean_return - risk_free_return) / std_dev_returns,
            interval: returns_period,
        })
    }

    /// Calculate the [`SharpeRatio`] of periodic returns sampled every `returns_period`.
    ///
    /// Uses the population standard deviation of the returns.
    pub fn from_returns<Iter>(
        returns: Iter,
        risk_free_return: f64,
        returns_period: Interval,
    ) -> Result<Self, PerformanceError>
    where
        Iter: IntoIterator<Item = f64>,
    {
        let moments = Moments::from_values(returns);
        if moments.count == 0 {
            return Err(PerformanceError::EmptySeries);
        }

        Self::calculate(
            risk_free_return,
            moments.mean,
            moments.population_std_dev(),
            returns_period,
        )
    }

    /// Scale the [`SharpeRatio`] from the current [`TimeInterval`] to the provided [`TimeInterval`].
    ///
    /// This scaling assumed the returns are independently and identically distributed (IID).
    pub fn scale<TargetInterval>(self, target: TargetInterval) -> SharpeRatio<TargetInterval>
    where
        TargetInterval: TimeInterval,
    {
        // Determine scale factor: square root of number of Self Intervals in TargetIntervals
        let scale = (target.interval().num_seconds() as f64
            / self.interval.interval().num_seconds() as f64)
            .sqrt();

        SharpeRatio {
            value: self.value * scale,
            interval: target,
        }
    }
}
