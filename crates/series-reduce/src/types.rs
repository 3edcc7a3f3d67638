// File: crates/series-reduce/src/types.rs
// Summary: Shared types and constants (samples, time units, reduction limits).

/// Milliseconds in one second.
pub const SECOND_MS: i64 = 1_000;
/// Milliseconds in one minute.
pub const MINUTE_MS: i64 = 60 * SECOND_MS;
/// Milliseconds in one hour.
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
/// Milliseconds in one day.
pub const DAY_MS: i64 = 24 * HOUR_MS;
/// Milliseconds in one week.
pub const WEEK_MS: i64 = 7 * DAY_MS;
/// Fixed-width "month" (30.4 days), not calendar aware.
pub const MONTH_MS: i64 = 2_628_000_000;
/// Fixed-width quarter of a year.
pub const QUARTER_MS: i64 = 7_889_231_499;
/// Fixed-width half year.
pub const HALF_YEAR_MS: i64 = 15_778_462_998;

/// Number of visual ticks the AUTO granularity aims for.
pub const REASONABLE_TICKS_IN_CHART: i64 = 300;
/// Smallest bucket width the AUTO granularity will pick.
pub const MIN_AUTO_DIVISOR_MS: i64 = 100;

/// One measured point of a series.
/// Contract: `timestamp` is epoch milliseconds (UTC).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub const fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Self { timestamp, value }
    }
}

/// True when timestamps never decrease.
pub fn is_time_ordered(samples: &[Sample]) -> bool {
    samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}
