// File: crates/series-reduce/src/error.rs
// Summary: Error type shared by simplifiers, smoothers and the pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReduceError {
    /// Unknown or absent algorithm / granularity selection.
    #[error("unsupported {what}: {value}")]
    Unsupported { what: &'static str, value: String },

    #[error("illegal time range: first timestamp {start} is after last timestamp {end}")]
    IllegalTimeRange { start: i64, end: i64 },

    #[error("timestamp {0} lies outside the calendar index range")]
    OutOfCalendarRange(i64),

    #[error("reduction interrupted")]
    Interrupted,

    #[error("reduction task for series '{series}' failed: {message}")]
    TaskFailed { series: String, message: String },

    #[error("failed to build worker pool")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

impl ReduceError {
    pub fn unsupported(what: &'static str, value: impl Into<String>) -> Self {
        Self::Unsupported { what, value: value.into() }
    }
}

pub type Result<T, E = ReduceError> = std::result::Result<T, E>;
