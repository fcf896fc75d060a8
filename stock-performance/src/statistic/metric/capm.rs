use crate::{
    error::PerformanceError,
    statistic::{
        algorithm::{Moments, population_covariance},
        time::TimeInterval,
    },
};
use serde::{Deserialize, Serialize};

/// Minimum number of aligned observations an ordinary least squares fit requires.
const MIN_REGRESSION_OBSERVATIONS: usize = 2;

/// Ordinary least squares fit of the Capital Asset Pricing Model:
///
/// `r_security - rf = alpha + beta * (r_benchmark - rf) + error`
///
/// See docs: <https://www.investopedia.com/terms/c/capm.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct CapmRegression {
    /// Intercept: excess return not explained by benchmark excess return.
    pub alpha: f64,
    /// Slope: sensitivity of security excess return to benchmark excess return.
    pub beta: f64,
    pub observations: usize,
}

impl CapmRegression {
    /// Regress security excess returns on benchmark excess returns.
    ///
    /// Both slices must be aligned by date (same periods, same ordering); a length mismatch is
    /// rejected, but equal length slices from different periods cannot be detected here.
    pub fn calculate(
        security_returns: &[f64],
        benchmark_returns: &[f64],
        risk_free_return: f64,
    ) -> Result<Self, PerformanceError> {
        if security_returns.is_empty() || benchmark_returns.is_empty() {
            return Err(PerformanceError::EmptySeries);
        }

        if security_returns.len() != benchmark_returns.len() {
            return Err(PerformanceError::MisalignedSeries {
                security: security_returns.len(),
                benchmark: benchmark_returns.len(),
            });
        }

        if security_returns.len() < MIN_REGRESSION_OBSERVATIONS {
            return Err(PerformanceError::InsufficientObservations {
                required: MIN_REGRESSION_OBSERVATIONS,
                actual: security_returns.len(),
            });
        }

        let excess_security = excess_returns(security_returns, risk_free_return);
        let excess_benchmark = excess_returns(benchmark_returns, risk_free_return);

        let security_moments = Moments::from_values(excess_security.iter().copied());
        let benchmark_moments = Moments::from_values(excess_benchmark.iter().copied());

        let benchmark_variance = benchmark_moments.population_variance();
        if benchmark_variance <= f64::EPSILON * f64::EPSILON {
            return Err(PerformanceError::ZeroVariance);
        }

        let covariance = population_covariance(
            &excess_benchmark,
            &excess_security,
            benchmark_moments.mean,
            security_moments.mean,
        );

        let beta = covariance / benchmark_variance;
        let alpha = security_moments.mean - beta * benchmark_moments.mean;

        Ok(Self {
            alpha,
            beta,
            observations: security_returns.len(),
        })
    }
}

fn excess_returns(returns: &[f64], risk_free_return: f64) -> Vec<f64> {
    returns
        .iter()
        .map(|value| value - risk_free_return)
        .collect()
}

/// Represents a CAPM Alpha value over a specific [`TimeInterval`].
///
/// Alpha is the intercept of the [`CapmRegression`]: the per-period excess return earned
/// independently of the benchmark.
///
/// See docs: <https://www.investopedia.com/terms/a/alpha.asp>
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Alpha<Interval> {
    pub value: f64,
    pub interval: Interval,
}

impl<Interval> Alpha<Interval>
where
    Interval: TimeInterval,
{
    /// Take the [`Alpha`] of a [`CapmRegression`] over returns sampled every `returns_period`.
    pub fn from_regression(regression: &CapmRegression, returns_period: Interval) -> Self {
        Self {
            value: regression.alpha,
            interval: returns_period,
        }
    }

    /// Calculate the [`Alpha`] of aligned security & benchmark returns.
    pub fn calculate(
        security_returns: &[f64],
        benchmark_returns: &[f64],
        risk_free_return: f64,
        returns_period: Interval,
    ) -> Result<Self, PerformanceError> {
        CapmRegression::calculate(security_returns, benchmark_returns, risk_free_return)
            .map(|regression| Self::from_regression(&regression, returns_period))
    }

    /// Scale the [`Alpha`] from the current [`TimeInterval`] to the provided [`TimeInterval`].
    ///
    /// Like a rate of return, alpha scales linearly with time (eg/ monthly alpha * 12).
    pub fn scale<TargetInterval>(self, target: TargetInterval) -> Alpha<TargetInterval>
    where
        TargetInterval: TimeInterval,
    {
        let scale = target.interval().num_seconds() as f64
            / self.interval.interval().num_seconds() as f64;

        Alpha {
            value: self.value * scale,
            interval: target,
        }
    }
}

/// CAPM Beta: covariance of security & benchmark excess returns over the variance of benchmark
/// excess returns.
///
/// Beta is a ratio of returns sampled over the same periods, so it carries no [`TimeInterval`].
///
/// See docs: <https://www.investopedia.com/terms/b/beta.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Beta {
    pub value: f64,
}

impl Beta {
    pub fn from_regression(regression: &CapmRegression) -> Self {
        Self {
            value: regression.beta,
        }
    }

    /// Calculate the [`Beta`] of aligned security & benchmark returns.
    pub fn calculate(
        security_returns: &[f64],
        benchmark_returns: &[f64],
        risk_free_return: f64,
    ) -> Result<Self, PerformanceError> {
        CapmRegression::calculate(security_returns, benchmark_returns, risk_free_return)
            .map(|regression| Self::from_regression(&regression))
    }
}
