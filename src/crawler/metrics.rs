//! Running load metrics for one crawl run
//!
//! Aggregation is a pure state transition `(Metrics, FetchOutcome) ->
//! Metrics`; the engine threads the returned value rather than mutating
//! through shared aliasing, which keeps the aggregator testable in
//! isolation and safe if fetches are ever parallelized.

use crate::crawler::fetcher::FetchOutcome;
use serde::Serialize;

/// Cumulative statistics over the fetch outcomes of one crawl run
///
/// `avg_load_millis` is the arithmetic mean of every timed duration seen
/// so far; fastest/slowest are running min/max over the same set. The
/// status counters classify by integer division of the status code by
/// 100; 1xx and 4xx responses, and outcomes with no status at all, land
/// in no bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Count of outcomes that carried a measurable duration
    pub total_timed: u64,

    /// Arithmetic mean over all timed durations
    pub avg_load_millis: f64,

    /// Running minimum over timed durations
    pub fastest_load_millis: u64,

    /// Running maximum over timed durations
    pub slowest_load_millis: u64,

    /// Outcomes with a 2xx status
    pub success_count: u64,

    /// Outcomes with a 3xx status
    pub redirect_count: u64,

    /// Outcomes with a 5xx status
    pub error_count: u64,
}

impl Metrics {
    /// Returns the metrics after observing one more fetch outcome
    ///
    /// Outcomes without a duration skip every timing field; outcomes
    /// without a status skip every counter. Counters never decrease.
    #[must_use]
    pub fn updated(&self, outcome: &FetchOutcome) -> Metrics {
        let mut next = self.clone();

        if let Some(duration) = outcome.duration_millis {
            if next.total_timed == 0 {
                next.avg_load_millis = duration as f64;
                next.fastest_load_millis = duration;
                next.slowest_load_millis = duration;
                next.total_timed = 1;
            } else {
                next.avg_load_millis = (next.avg_load_millis * next.total_timed as f64
                    + duration as f64)
                    / (next.total_timed + 1) as f64;
                next.total_timed += 1;
                next.fastest_load_millis = next.fastest_load_millis.min(duration);
                next.slowest_load_millis = next.slowest_load_millis.max(duration);
            }
        }

        if let Some(status) = outcome.status {
            match status / 100 {
                2 => next.success_count += 1,
                3 => next.redirect_count += 1,
                5 => next.error_count += 1,
                _ => {}
            }
        }

        next
    }
}
