use crate::error::PerformanceError;
use serde::{Deserialize, Serialize};

/// Compound Total Return of a return series: the product of (1 + r) over every period, less one.
///
/// See docs: <https://www.investopedia.com/terms/t/totalreturn.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct TotalReturn {
    pub value: f64,
}

impl TotalReturn {
    /// Calculate the [`TotalReturn`] by compounding the provided periodic returns.
    pub fn calculate<Iter>(returns: Iter) -> Result<Self, PerformanceError>
    where
        Iter: IntoIterator<Item = f64>,
    {
        let (count, growth) = returns
            .into_iter()
            .fold((0_usize, 1.0_f64), |(count, growth), value| {
                (count + 1, growth * (1.0 + value))
            });

        if count == 0 {
            return Err(PerformanceError::EmptySeries);
        }

        Ok(Self {
            value: growth - 1.0,
        })
    }

    /// Compound this [`TotalReturn`] with the [`TotalReturn`] of the period that follows it.
    pub fn compound(self, next: Self) -> Self {
        Self {
            value: (1.0 + self.value) * (1.0 + next.value) - 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_total_return_single_period_equals_period_return() {
        for value in [0.0, 0.05, -0.12, 1.5, -1.0] {
            let actual = TotalReturn::calculate([value]).unwrap();
            assert_relative_eq!(actual.value, value, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_total_return_compounds_periods() {
        // 1.1 * 0.95 * 1.2 - 1
        let actual = TotalReturn::calculate([0.1, -0.05, 0.2]).unwrap();
        assert_relative_eq!(actual.value, 0.254, epsilon = 1e-12);
    }

    #[test]
    fn test_total_return_split_then_recombine() {
        let returns = [0.0152, -0.0321, 0.0087, 0.0412, -0.0066, 0.0230, -0.0149];
        let full = TotalReturn::calculate(returns).unwrap();

        for split in 1..returns.len() {
            let (head, tail) = returns.split_at(split);
            let recombined = TotalReturn::calculate(head.iter().copied())
                .unwrap()
                .compound(TotalReturn::calculate(tail.iter().copied()).unwrap());

            assert_relative_eq!(recombined.value, full.value, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_total_return_empty_series() {
        let actual = TotalReturn::calculate(std::iter::empty());
        assert_eq!(actual, Err(PerformanceError::EmptySeries));
    }
}
