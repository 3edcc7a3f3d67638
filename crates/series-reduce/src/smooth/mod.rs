// File: crates/series-reduce/src/smooth/mod.rs
// Summary: Temporal aggregation of samples into fixed-width or calendar-month buckets.
// Notes:
// - One output sample per non-empty bucket, at the bucket's canonical key.
// - Output is sorted by key; empty buckets produce nothing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ReduceError, Result};
use crate::series::Series;
use crate::types::{
    Sample, DAY_MS, HALF_YEAR_MS, HOUR_MS, MINUTE_MS, MIN_AUTO_DIVISOR_MS, MONTH_MS, QUARTER_MS,
    REASONABLE_TICKS_IN_CHART, SECOND_MS, WEEK_MS,
};

pub mod aggregate;
pub mod calendar;

pub use aggregate::Aggregation;
pub use calendar::{CalendarIndex, MonthCursor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One bucket per exact timestamp.
    Off,
    Seconds,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    CalendarMonth,
    Quarter,
    HalfYear,
    /// Width derived from the series' time span.
    Auto,
}

impl Granularity {
    pub const ALL: [Granularity; 11] = [
        Self::Off,
        Self::Seconds,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::CalendarMonth,
        Self::Quarter,
        Self::HalfYear,
        Self::Auto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Seconds => "SECONDS",
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::CalendarMonth => "CALENDAR_MONTH",
            Self::Quarter => "QUARTER",
            Self::HalfYear => "HALF_YEAR",
            Self::Auto => "AUTO",
        }
    }

    /// Human readable label for selection lists.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Off => "Minimal/exact",
            Self::Seconds => "Seconds",
            Self::Minute => "Minutes",
            Self::Hour => "Hours",
            Self::Day => "Days",
            Self::Week => "Weeks",
            Self::Month => "Months",
            Self::CalendarMonth => "Calender months",
            Self::Quarter => "Quarter",
            Self::HalfYear => "Half-year",
            Self::Auto => "Auto",
        }
    }

    /// Bucket width in ms for the fixed-width granularities.
    pub fn fixed_divisor(&self) -> Option<i64> {
        match self {
            Self::Seconds => Some(SECOND_MS),
            Self::Minute => Some(MINUTE_MS),
            Self::Hour => Some(HOUR_MS),
            Self::Day => Some(DAY_MS),
            Self::Week => Some(WEEK_MS),
            Self::Month => Some(MONTH_MS),
            Self::Quarter => Some(QUARTER_MS),
            Self::HalfYear => Some(HALF_YEAR_MS),
            Self::Off | Self::CalendarMonth | Self::Auto => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Granularity {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReduceError::unsupported("granularity", s))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SmoothingType {
    None,
    Avg,
    Min,
    Max,
    Sum,
    Median,
    ValueCount,
    Diff,
}

impl SmoothingType {
    pub const ALL: [SmoothingType; 8] =
        [Self::None, Self::Avg, Self::Min, Self::Max, Self::Sum, Self::Median, Self::ValueCount, Self::Diff];

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Sum => "SUM",
            Self::Median => "MEDIAN",
            Self::ValueCount => "VALUE_COUNT",
            Self::Diff => "DIFF",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "Inactive",
            Self::Avg => "Average",
            Self::Min => "Min",
            Self::Max => "Max",
            Self::Sum => "Sum",
            Self::Median => "Median",
            Self::ValueCount => "Number of values",
            Self::Diff => "Difference between values",
        }
    }

    /// Bucket reduction for this type; `None` has no aggregator.
    pub fn aggregation(&self) -> Option<Aggregation> {
        match self {
            Self::None => None,
            Self::Avg => Some(Aggregation::Avg),
            Self::Min => Some(Aggregation::Min),
            Self::Max => Some(Aggregation::Max),
            Self::Sum => Some(Aggregation::Sum),
            Self::Median => Some(Aggregation::Median),
            Self::ValueCount => Some(Aggregation::Count),
            Self::Diff => Some(Aggregation::Diff),
        }
    }
}

impl fmt::Display for SmoothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for SmoothingType {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReduceError::unsupported("smoothing type", s))
    }
}

/// Aggregation plus granularity; stateless, reusable across series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Smoother {
    pub aggregation: Aggregation,
    pub granularity: Granularity,
}

impl Smoother {
    pub const fn new(aggregation: Aggregation, granularity: Granularity) -> Self {
        Self { aggregation, granularity }
    }

    pub fn resolve(smoothing: SmoothingType, granularity: Granularity) -> Result<Self> {
        let aggregation = smoothing
            .aggregation()
            .ok_or_else(|| ReduceError::unsupported("smoothing type", smoothing.name()))?;
        Ok(Self::new(aggregation, granularity))
    }

    /// AUTO width: about `REASONABLE_TICKS_IN_CHART` buckets over the span.
    fn auto_divisor(samples: &[Sample]) -> Result<i64> {
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return Ok(MIN_AUTO_DIVISOR_MS);
        };
        if first.timestamp > last.timestamp {
            return Err(ReduceError::IllegalTimeRange { start: first.timestamp, end: last.timestamp });
        }
        Ok(((last.timestamp - first.timestamp) / REASONABLE_TICKS_IN_CHART).max(MIN_AUTO_DIVISOR_MS))
    }

    fn bucket(&self, samples: &[Sample]) -> Result<BTreeMap<i64, Vec<f64>>> {
        let mut buckets: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        match self.granularity {
            Granularity::Off => {
                for s in samples {
                    buckets.entry(s.timestamp).or_default().push(s.value);
                }
            }
            Granularity::CalendarMonth => {
                let calendar = CalendarIndex::global();
                let mut cursor = None;
                for s in samples {
                    let key = calendar.month_key(s.timestamp, &mut cursor)?;
                    buckets.entry(key).or_default().push(s.value);
                }
            }
            g => {
                let divisor = match g.fixed_divisor() {
                    Some(d) => d,
                    None => Self::auto_divisor(samples)?,
                };
                let Some(smallest) = samples.iter().map(|s| s.timestamp).min() else {
                    return Ok(buckets);
                };
                for s in samples {
                    let slice = (s.timestamp - smallest).div_euclid(divisor);
                    let key = smallest + divisor / 2 + slice * divisor;
                    buckets.entry(key).or_default().push(s.value);
                }
            }
        }
        Ok(buckets)
    }

    /// Aggregate `samples` into one sample per bucket, sorted by key.
    pub fn smooth(&self, samples: &[Sample]) -> Result<Vec<Sample>> {
        let buckets = self.bucket(samples)?;
        let mut out = Vec::with_capacity(buckets.len());
        let mut previous_sum = 0.0;
        for (key, mut values) in buckets {
            let reduced = self.aggregation.reduce(&mut values);
            let value = match self.aggregation {
                Aggregation::Diff => {
                    let diff = reduced - previous_sum;
                    previous_sum = reduced;
                    diff
                }
                _ => reduced,
            };
            out.push(Sample::new(key, value));
        }
        Ok(out)
    }

    /// Replace the samples of `series` with their aggregate.
    pub fn smooth_series(&self, series: &mut Series) -> Result<()> {
        series.samples = self.smooth(&series.samples)?;
        Ok(())
    }
}

/// Selector entry point: absent or unsupported input is rejected.
pub fn resolve_smoother(smoothing: Option<SmoothingType>, granularity: Option<Granularity>) -> Result<Smoother> {
    let smoothing = smoothing.ok_or_else(|| ReduceError::unsupported("smoothing type", "<none>"))?;
    let granularity = granularity.ok_or_else(|| ReduceError::unsupported("granularity", "<none>"))?;
    Smoother::resolve(smoothing, granularity)
}
