use crate::data::SecurityId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated by the `stock-performance` crate.
///
/// Statistic calculations fail fast with one of these rather than returning a silently wrong
/// value (eg/ `0.0` or `NaN`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Error)]
pub enum PerformanceError {
    #[error("return series is empty")]
    EmptySeries,

    #[error("misaligned series: security has {security} observations, benchmark has {benchmark}")]
    MisalignedSeries { security: usize, benchmark: usize },

    #[error("insufficient observations: required {required}, found {actual}")]
    InsufficientObservations { required: usize, actual: usize },

    #[error("zero variance in returns used as a ratio denominator")]
    ZeroVariance,

    #[error("invalid time span: {0}")]
    InvalidTimeSpan(String),

    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    #[error("unknown security: {0}")]
    UnknownSecurity(SecurityId),

    #[error("CSV: {0}")]
    Csv(String),

    #[error("IO: {0}")]
    Io(String),

    #[error("config: {0}")]
    Config(String),

    #[error("SQL query: {0}")]
    Query(String),
}

impl From<csv::Error> for PerformanceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value.to_string())
    }
}

impl From<std::io::Error> for PerformanceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for PerformanceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}
