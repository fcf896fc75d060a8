use crate::{data::DateRange, error::PerformanceError};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};

/// Seconds in a 365 day year.
const SECONDS_PER_YEAR_365: i64 = 365 * 24 * 60 * 60;

pub trait TimeInterval: Copy {
    fn name(&self) -> SmolStr;
    fn interval(&self) -> TimeDelta;
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Annual365;

impl TimeInterval for Annual365 {
    fn name(&self) -> SmolStr {
        SmolStr::new("Annual(365)")
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::days(365)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Annual252;

impl TimeInterval for Annual252 {
    fn name(&self) -> SmolStr {
        SmolStr::new("Annual(252)")
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::days(252)
    }
}

/// One twelfth of [`Annual365`], so that monthly statistics scale to annual by exactly 12 periods.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Monthly;

impl TimeInterval for Monthly {
    fn name(&self) -> SmolStr {
        SmolStr::new("Monthly")
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::seconds(SECONDS_PER_YEAR_365 / 12)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Daily;

impl TimeInterval for Daily {
    fn name(&self) -> SmolStr {
        SmolStr::new("Daily")
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::days(1)
    }
}

impl TimeInterval for TimeDelta {
    fn name(&self) -> SmolStr {
        format_smolstr!("Duration {} (minutes)", self.num_minutes())
    }

    fn interval(&self) -> TimeDelta {
        *self
    }
}

/// Sampling frequency of a return series, selected by configuration.
///
/// Daily returns are trading-day returns and annualise over [`Annual252`], monthly returns
/// annualise over [`Annual365`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    #[default]
    Monthly,
}

/// Day count convention used to express a [`DateRange`] in years.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct DayCount {
    pub days_in_year: f64,
}

impl Default for DayCount {
    fn default() -> Self {
        Self {
            days_in_year: 365.25,
        }
    }
}

impl DayCount {
    /// Number of years spanned by the inclusive [`DateRange`].
    ///
    /// eg/ 2019-01-01 to 2019-12-31 is 365 days, or 365 / 365.25 years.
    pub fn years(&self, range: &DateRange) -> Result<f64, PerformanceError> {
        if range.end < range.start {
            return Err(PerformanceError::InvalidTimeSpan(format!(
                "end date {} is before start date {}",
                range.end, range.start
            )));
        }

        if !(self.days_in_year.is_finite() && self.days_in_year > 0.0) {
            return Err(PerformanceError::InvalidTimeSpan(format!(
                "days in year must be positive, found {}",
                self.days_in_year
            )));
        }

        Ok(range.days_inclusive() as f64 / self.days_in_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_monthly_is_twelfth_of_annual_365() {
        let ratio =
            Annual365.interval().num_seconds() as f64 / Monthly.interval().num_seconds() as f64;
        assert_eq!(ratio, 12.0);
    }

    #[test]
    fn test_day_count_years() {
        struct TestCase {
            range: DateRange,
            day_count: DayCount,
            expected: f64,
        }

        let cases = vec![
            // TC0: calendar year with 365.25 convention
            TestCase {
                range: DateRange::new(date("2019-01-01"), date("2019-12-31")),
                day_count: DayCount::default(),
                expected: 365.0 / 365.25,
            },
            // TC1: calendar year with 365 convention is exactly one year
            TestCase {
                range: DateRange::new(date("2019-01-01"), date("2019-12-31")),
                day_count: DayCount { days_in_year: 365.0 },
                expected: 1.0,
            },
            // TC2: single day
            TestCase {
                range: DateRange::new(date("2020-03-01"), date("2020-03-01")),
                day_count: DayCount::default(),
                expected: 1.0 / 365.25,
            },
            // TC3: Mar..Oct 2020
            TestCase {
                range: DateRange::new(date("2020-03-01"), date("2020-10-31")),
                day_count: DayCount::default(),
                expected: 245.0 / 365.25,
            },
        ];

        for test in cases {
            let actual = test.day_count.years(&test.range).unwrap();
            assert_relative_eq!(actual, test.expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_day_count_years_rejects_inverted_range() {
        let range = DateRange::new(date("2019-12-31"), date("2019-01-01"));
        assert!(matches!(
            DayCount::default().years(&range),
            Err(PerformanceError::InvalidTimeSpan(_))
        ));
    }

    #[test]
    fn test_frequency_deserialise() {
        let actual: Frequency = serde_json::from_str(r#""daily""#).unwrap();
        assert_eq!(actual, Frequency::Daily);
        assert_eq!(Frequency::default(), Frequency::Monthly);
    }
}
