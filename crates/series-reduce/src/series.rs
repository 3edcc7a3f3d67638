// File: crates/series-reduce/src/series.rs
// Summary: Named series model holding time-ordered samples.
// Notes:
// - Reducers replace `samples` in place; callers hand over a `&mut [Series]`
//   and must treat the previous contents as consumed.

use crate::types::{is_time_ordered, Sample};

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub samples: Vec<Sample>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), samples: Vec::new() }
    }

    pub fn with_samples(name: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self { name: name.into(), samples }
    }

    /// Build a series from `(timestamp, value)` pairs.
    pub fn from_pairs(name: impl Into<String>, pairs: impl IntoIterator<Item = (i64, f64)>) -> Self {
        Self { name: name.into(), samples: pairs.into_iter().map(Sample::from).collect() }
    }

    /// Try to construct a series enforcing the ordering precondition:
    /// timestamps must be non-decreasing.
    pub fn try_new(name: impl Into<String>, samples: Vec<Sample>) -> Result<Self, &'static str> {
        if !is_time_ordered(&samples) { return Err("samples are not ordered by timestamp"); }
        Ok(Self { name: name.into(), samples })
    }

    pub fn len(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    pub fn first(&self) -> Option<&Sample> { self.samples.first() }

    pub fn last(&self) -> Option<&Sample> { self.samples.last() }

    /// Time span covered by the series, `None` when empty.
    pub fn time_range(&self) -> Option<(i64, i64)> {
        Some((self.first()?.timestamp, self.last()?.timestamp))
    }
}

/// Sum of sample counts over all series.
pub fn total_samples(series: &[Series]) -> usize {
    series.iter().map(Series::len).sum()
}
