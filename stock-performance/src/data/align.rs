use crate::data::{AlignedReturns, BenchmarkSeries, ReturnSeries};
use itertools::{EitherOrBoth, Itertools};
use tracing::debug;

/// Join a security's returns with the benchmark returns on date.
///
/// Security observations with no benchmark observation for the same date are dropped, as are
/// benchmark observations outside the security's dates. Both inputs are strictly ascending by
/// date, so a single merge pass suffices.
pub fn align(security: &ReturnSeries, benchmark: &BenchmarkSeries) -> AlignedReturns {
    let mut aligned = AlignedReturns {
        security: security.security.clone(),
        dates: Vec::with_capacity(security.len()),
        security_returns: Vec::with_capacity(security.len()),
        benchmark_returns: Vec::with_capacity(security.len()),
    };

    let mut dropped = 0_usize;

    security
        .observations()
        .iter()
        .merge_join_by(benchmark.series.observations(), |sec, bench| {
            sec.date.cmp(&bench.date)
        })
        .for_each(|joined| match joined {
            EitherOrBoth::Both(sec, bench) => {
                aligned.dates.push(sec.date);
                aligned.security_returns.push(sec.value);
                aligned.benchmark_returns.push(bench.value);
            }
            EitherOrBoth::Left(_) => dropped += 1,
            EitherOrBoth::Right(_) => {}
        });

    if dropped > 0 {
        debug!(
            security = %security.security,
            benchmark = %benchmark.name,
            dropped,
            "dropped security observations with no matching benchmark date"
        );
    }

    aligned
}
