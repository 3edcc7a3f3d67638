// File: crates/series-reduce/src/simplify/line_gradient.rs
// Summary: Single-pass reducer using one global tolerance on the change of slope at each point.

use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::series::{total_samples, Series};
use crate::simplify::Simplifier;
use crate::types::Sample;

/// Series with this many samples or fewer are never touched.
pub const MIN_VALUE_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, Default)]
pub struct LineGradientSimplifier;

#[inline]
fn slope(a: &Sample, b: &Sample) -> f64 {
    let dt = b.timestamp - a.timestamp;
    if dt <= 0 { f64::INFINITY } else { (b.value - a.value) / dt as f64 }
}

/// |outgoing slope - incoming slope| for every interior sample; empty for
/// short series. Undefined slopes count as infinite.
fn slope_changes(samples: &[Sample]) -> Vec<f64> {
    if samples.len() <= MIN_VALUE_COUNT { return Vec::new(); }
    samples
        .windows(3)
        .map(|w| {
            let d = (slope(&w[1], &w[2]) - slope(&w[0], &w[1])).abs();
            if d.is_nan() { f64::INFINITY } else { d }
        })
        .collect()
}

/// Drop interior samples whose slope change satisfies `drop`.
fn prune(samples: &mut Vec<Sample>, drop: impl Fn(f64) -> bool) {
    let changes = slope_changes(samples);
    if changes.is_empty() { return; }
    let last = samples.len() - 1;
    let mut idx = 0usize;
    samples.retain(|_| {
        let keep = idx == 0 || idx == last || !drop(changes[idx - 1]);
        idx += 1;
        keep
    });
}

/// Removes collinear interior samples (zero slope change) from every series
/// and returns the tolerance that leaves about `threshold` non-collinear
/// samples overall, or `None` when no further reduction is needed.
pub fn global_tolerance(series: &mut [Series], threshold: usize, cancel: &CancelToken) -> Result<Option<f64>> {
    if threshold == 0 { return Ok(None); }
    let per_series: Vec<Vec<f64>> = series
        .par_iter_mut()
        .map(|s| -> Result<Vec<f64>> {
            cancel.check()?;
            let changes = slope_changes(&s.samples);
            prune(&mut s.samples, |d| d == 0.0);
            Ok(changes.into_iter().filter(|d| *d > 0.0 && d.is_finite()).collect())
        })
        .collect::<Result<_>>()?;

    let mut changes: Vec<f64> = per_series.into_iter().flatten().collect();
    if changes.len() <= threshold { return Ok(None); }
    changes.sort_by(f64::total_cmp);
    Ok(Some(changes[changes.len() - threshold]))
}

impl Simplifier for LineGradientSimplifier {
    fn id(&self) -> &'static str { "line_gradient" }

    fn simplify(&self, series: &mut [Series], threshold: i64, cancel: &CancelToken) -> Result<()> {
        if threshold <= 0 || total_samples(series) as u64 <= threshold as u64 { return Ok(()); }
        let threshold = usize::try_from(threshold).unwrap_or(usize::MAX);

        let Some(tolerance) = global_tolerance(series, threshold, cancel)? else { return Ok(()) };

        series.par_iter_mut().try_for_each(|s| -> Result<()> {
            cancel.check()?;
            let before = s.len();
            prune(&mut s.samples, |d| d <= tolerance);
            debug!(series = %s.name, tolerance, before, after = s.len(), "line gradient reduced");
            Ok(())
        })
    }
}
