use crate::{error::PerformanceError, statistic::metric::total_return::TotalReturn};
use serde::{Deserialize, Serialize};

/// Compound Annual Growth Rate: the constant annual rate that produces the same total return
/// over the elapsed number of years.
///
/// See docs: <https://www.investopedia.com/terms/c/cagr.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Cagr {
    pub value: f64,
    pub years: f64,
}

impl Cagr {
    /// Calculate the [`Cagr`] from a total return earned over `years`.
    pub fn calculate(total_return: f64, years: f64) -> Result<Self, PerformanceError> {
        if !(years.is_finite() && years > 0.0) {
            return Err(PerformanceError::InvalidTimeSpan(format!(
                "CAGR requires a positive number of years, found {years}"
            )));
        }

        let value = (1.0 + total_return).powf(years.recip()) - 1.0;
        if !value.is_finite() {
            return Err(PerformanceError::InvalidObservation(format!(
                "total return {total_return} cannot be annualised"
            )));
        }

        Ok(Self { value, years })
    }

    /// Calculate the [`Cagr`] of periodic returns earned over `years`.
    pub fn from_returns<Iter>(returns: Iter, years: f64) -> Result<Self, PerformanceError>
    where
        Iter: IntoIterator<Item = f64>,
    {
        let total_return = TotalReturn::calculate(returns)?;
        Self::calculate(total_return.value, years)
    }
}
