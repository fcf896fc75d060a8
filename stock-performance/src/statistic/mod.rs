/// Statistical algorithms for analysing return series.
pub mod algorithm;

/// Financial metrics and the means to calculate them over different
/// [`TimeIntervals`](time::TimeInterval).
pub mod metric;

/// Per-security performance summaries measured against a benchmark.
///
/// For example, `StockPerformance`, `PerformanceSummary`, `PerformanceReport`.
pub mod summary;

/// TimeInterval definitions & day count conventions used for financial calculations.
///
/// For example, `Annual365`, `Annual252`, `Monthly`, `Daily`, etc.
pub mod time;
