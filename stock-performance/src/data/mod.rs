use crate::{FnvIndexMap, error::PerformanceError};
use chrono::NaiveDate;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, StrExt};
use std::borrow::Borrow;

/// Date alignment of security returns against a benchmark.
pub mod align;

/// CSV loaders for security & benchmark return files.
pub mod loader;

/// `SmolStr` ticker-region identifier for a security (eg/ "AAPL-US").
///
/// Identifiers are normalised to uppercase so "aapl-us" and "AAPL-US" are the same security.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Display)]
pub struct SecurityId(pub SmolStr);

impl SecurityId {
    pub fn new<S>(name: S) -> Self
    where
        S: Into<SmolStr>,
    {
        let name = name.into();
        if name.chars().any(char::is_lowercase) {
            Self(name.to_uppercase_smolstr())
        } else {
            Self(name)
        }
    }

    pub fn name(&self) -> &SmolStr {
        &self.0
    }
}

impl From<&str> for SecurityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<SmolStr> for SecurityId {
    fn from(value: SmolStr) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for SecurityId {
    fn borrow(&self) -> &str {
        self.0.borrow()
    }
}

impl AsRef<str> for SecurityId {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl<'de> serde::de::Deserialize<'de> for SecurityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        SmolStr::deserialize(deserializer).map(SecurityId::new)
    }
}

/// A single periodic return, stated as a fraction (0.01 == 1%).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Deserialize, Serialize, Constructor)]
pub struct ReturnObservation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Ordered periodic returns for one security.
///
/// Observations are strictly ascending by date and every value is finite.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReturnSeries {
    pub security: SecurityId,
    observations: Vec<ReturnObservation>,
}

impl ReturnSeries {
    /// Construct a validated [`ReturnSeries`].
    ///
    /// Observations must be strictly ascending by date (no duplicates) with finite values.
    pub fn new(
        security: SecurityId,
        observations: Vec<ReturnObservation>,
    ) -> Result<Self, PerformanceError> {
        if let Some(bad) = observations.iter().find(|obs| !obs.value.is_finite()) {
            return Err(PerformanceError::InvalidObservation(format!(
                "{security} has non-finite return {} on {}",
                bad.value, bad.date
            )));
        }

        if let Some(pair) = observations
            .windows(2)
            .find(|pair| pair[0].date >= pair[1].date)
        {
            return Err(PerformanceError::InvalidObservation(format!(
                "{security} observations are not strictly ascending: {} then {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self {
            security,
            observations,
        })
    }

    pub fn observations(&self) -> &[ReturnObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterator over the return values, in date order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|obs| obs.value)
    }
}

/// Market index returns that securities are measured against (eg/ S&P 500 total return).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct BenchmarkSeries {
    pub name: SmolStr,
    pub series: ReturnSeries,
}

/// Inclusive range of dates that return observations are selected from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Constructor)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, counting both the start & end date.
    pub fn days_inclusive(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Security & benchmark returns joined on date: same length, same ordering.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlignedReturns {
    pub security: SecurityId,
    pub dates: Vec<NaiveDate>,
    pub security_returns: Vec<f64>,
    pub benchmark_returns: Vec<f64>,
}

impl AlignedReturns {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Every security's [`AlignedReturns`] against one benchmark over one [`DateRange`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReturnDataset {
    pub benchmark: SmolStr,
    pub range: DateRange,
    pub securities: FnvIndexMap<SecurityId, AlignedReturns>,
}

impl ReturnDataset {
    /// Align each security's [`ReturnSeries`] with the [`BenchmarkSeries`].
    pub fn from_series<'a, Iter>(
        securities: Iter,
        benchmark: &BenchmarkSeries,
        range: DateRange,
    ) -> Self
    where
        Iter: IntoIterator<Item = &'a ReturnSeries>,
    {
        let securities = securities
            .into_iter()
            .map(|series| (series.security.clone(), align::align(series, benchmark)))
            .collect();

        Self {
            benchmark: benchmark.name.clone(),
            range,
            securities,
        }
    }
}
