/// Grouping of [Welford Online](https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Welford's_online_algorithm)
/// algorithms for calculating running values such as mean and variance in one pass through.
pub mod welford_online {
    /// Calculates the next mean.
    pub fn calculate_mean<T>(mut prev_mean: T, next_value: T, count: T) -> T
    where
        T: Copy + std::ops::Sub<Output = T> + std::ops::Div<Output = T> + std::ops::AddAssign,
    {
        prev_mean += (next_value - prev_mean) / count;
        prev_mean
    }

    /// Calculates the next Welford Online recurrence relation M.
    pub fn calculate_recurrence_relation_m(
        prev_m: f64,
        prev_mean: f64,
        new_value: f64,
        new_mean: f64,
    ) -> f64 {
        prev_m + ((new_value - prev_mean) * (new_value - new_mean))
    }

    /// Calculates the next biased 'Population' Variance using the Welford Online recurrence relation M.
    pub fn calculate_population_variance(recurrence_relation_m: f64, count: f64) -> f64 {
        match count < 1.0 {
            true => 0.0,
            false => recurrence_relation_m / count,
        }
    }
}

/// Mean & dispersion of a dataset, accumulated in one pass.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Moments {
    pub count: usize,
    pub mean: f64,
    pub recurrence_relation_m: f64,
}

impl Moments {
    /// Accumulate the [`Moments`] of every value in the dataset.
    pub fn from_values<Iter>(values: Iter) -> Self
    where
        Iter: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(Self::default(), |mut moments, value| {
            moments.update(value);
            moments
        })
    }

    /// Iteratively update the [`Moments`] with the next value in the dataset.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let prev_mean = self.mean;
        self.mean = welford_online::calculate_mean(prev_mean, value, self.count as f64);
        self.recurrence_relation_m = welford_online::calculate_recurrence_relation_m(
            self.recurrence_relation_m,
            prev_mean,
            value,
            self.mean,
        );
    }

    /// Biased 'Population' Variance (divide by count).
    pub fn population_variance(&self) -> f64 {
        welford_online::calculate_population_variance(
            self.recurrence_relation_m,
            self.count as f64,
        )
    }

    /// Population standard deviation.
    pub fn population_std_dev(&self) -> f64 {
        self.population_variance().abs().sqrt()
    }
}

/// Biased 'Population' covariance of two equal length datasets with known means.
///
/// Returns `0.0` for empty input; callers check lengths first.
pub fn population_covariance(x: &[f64], y: &[f64], mean_x: f64, mean_y: f64) -> f64 {
    if x.is_empty() {
        return 0.0;
    }

    let co_moment = x
        .iter()
        .zip(y)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>();

    co_moment / x.len() as f64
}
