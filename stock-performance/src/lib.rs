#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]
#![allow(clippy::type_complexity, type_alias_bounds)]

//! # Stock Performance
//! Performance statistics for stock return series measured against a market benchmark.
//!
//! Given periodic security returns & benchmark returns over a date range, calculates per security:
//! * **Total Return**: compounded return over the range.
//! * **CAGR**: total return annualised over the calendar span of the range.
//! * **Alpha & Beta**: CAPM regression of security excess returns on benchmark excess returns.
//! * **Sharpe Ratio**: mean excess return per unit of return volatility, scalable between
//!   [`TimeIntervals`](statistic::time::TimeInterval).
//!
//! Statistics are verified against canned self-test scenarios described by a JSON
//! [`Config`](config::Config), and a companion set of analytical [`SqlQuery`](query::SqlQuery)s
//! is bundled for the sample securities database.
//!
//! ## Getting Started
//! ```rust,no_run
//! use stock_performance::{config::Config, scenario::run_all};
//!
//! let config = Config::load("config/self_test.json").unwrap();
//!
//! for report in run_all(&config) {
//!     report.print();
//! }
//! ```

/// Configuration of input files, calculation conventions & self-test scenarios.
pub mod config;

/// Security & benchmark return series, their date alignment & CSV loading.
pub mod data;

/// Defines all possible errors that can occur when loading returns or calculating statistics.
pub mod error;

/// Provides default `tracing` logging initialisers.
pub mod logging;

/// Bundled analytical SQL queries over the sample securities database.
pub mod query;

/// Self-test scenarios that compare calculated statistics with expected values.
pub mod scenario;

/// Statistical algorithms, financial metrics & performance summaries.
pub mod statistic;

/// [`IndexMap`](indexmap::IndexMap) using the `Fnv` hasher, preserving insertion order.
pub type FnvIndexMap<K, V> = indexmap::IndexMap<K, V, fnv::FnvBuildHasher>;

