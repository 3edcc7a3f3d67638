// File: crates/series-reduce/src/simplify/gradient.rs
// Summary: Primary reducer; chunked, parallel, gradient-ranked point budget enforcement.
//
// Per chunk:
//   1. collapse samples sharing a timestamp to the most significant one
//   2. rank interior samples by the magnitude of their incoming gradient
//   3. keep samples above a budget-derived tolerance; the last dropped
//      sample before each kept one survives as the corner of the step
//
// Chunks of one series are processed on the shared pool and concatenated
// in chunk order. Series are processed concurrently on the same pool.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, warn};

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::{ReduceError, Result};
use crate::series::{total_samples, Series};
use crate::simplify::Simplifier;
use crate::types::Sample;

#[derive(Clone)]
pub struct GradientSimplifier {
    pool: Arc<ThreadPool>,
    workers: usize,
    min_chunk_size: usize,
    series_per_worker: usize,
}

/// How one series is cut into chunks and how much of the budget each chunk gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    pub chunk_size: usize,
    pub chunks: usize,
    pub segment_threshold: usize,
}

impl GradientSimplifier {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let workers = config.workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("gradient-worker-{i}"))
            .build()?;
        Ok(Self {
            pool: Arc::new(pool),
            workers,
            min_chunk_size: config.min_chunk_size.max(2),
            series_per_worker: config.series_per_worker.max(1),
        })
    }

    /// Split factor: many series already saturate the pool, so don't also split each one.
    fn chunk_splits(&self, series_count: usize) -> usize {
        if series_count > self.series_per_worker * self.workers { 1 } else { self.workers }
    }

    pub fn plan(&self, len: usize, series_count: usize, threshold: usize) -> ChunkPlan {
        let splits = self.chunk_splits(series_count);
        let chunk_size = self.min_chunk_size.max(len / splits);
        let chunks = len.div_ceil(chunk_size).max(1);
        let segment_threshold = threshold / series_count.max(1) / chunks;
        ChunkPlan { chunk_size, chunks, segment_threshold }
    }

    fn simplify_series(&self, series: &mut Series, threshold: usize, series_count: usize, warned: &AtomicBool) -> Result<()> {
        let len = series.len();
        if len < 3 { return Ok(()); }

        let plan = self.plan(len, series_count, threshold);
        if plan.segment_threshold == 0 {
            if !warned.swap(true, Ordering::Relaxed) {
                warn!(
                    threshold,
                    series_count,
                    "point budget is smaller than the number of series chunks; affected series are left unreduced, use a much higher threshold"
                );
            }
            return Ok(());
        }

        let samples = &series.samples;
        let name = &series.name;
        let bounds = chunk_bounds(samples, plan.chunk_size);
        let parts: Vec<Result<Vec<Sample>>> = bounds
            .par_iter()
            .enumerate()
            .map(|(idx, &(start, end))| {
                let preceding = (start > 0).then(|| samples[start - 1]);
                let chunk = &samples[start..end];
                panic::catch_unwind(AssertUnwindSafe(|| filter_chunk(chunk, preceding, plan.segment_threshold)))
                    .map_err(|payload| {
                        let message = panic_message(payload.as_ref());
                        error!(series = %name, chunk = idx, %message, "gradient chunk task failed");
                        ReduceError::TaskFailed { series: name.clone(), message }
                    })
            })
            .collect();

        let mut merged = Vec::with_capacity(plan.segment_threshold * bounds.len() + 2 * bounds.len());
        for part in parts {
            merged.extend(part?);
        }
        debug!(series = %series.name, before = len, after = merged.len(), chunks = bounds.len(), "gradient reduced");
        series.samples = merged;
        Ok(())
    }
}

impl Simplifier for GradientSimplifier {
    fn id(&self) -> &'static str { "gradient" }

    /// Threshold 0 or negative means "no simplification" for this reducer.
    fn simplify(&self, series: &mut [Series], threshold: i64, _cancel: &CancelToken) -> Result<()> {
        let total = total_samples(series);
        if threshold <= 0 || total as u64 <= threshold as u64 { return Ok(()); }

        let threshold = usize::try_from(threshold).unwrap_or(usize::MAX);
        let series_count = series.len();
        let warned = AtomicBool::new(false);

        // Every series runs to completion; the first failure is reported afterwards.
        let outcomes: Vec<Result<()>> = self.pool.install(|| {
            series
                .par_iter_mut()
                .map(|s| self.simplify_series(s, threshold, series_count, &warned))
                .collect()
        });
        outcomes.into_iter().collect()
    }
}

/// `[start, end)` ranges of about `chunk_size` samples. A cut never splits
/// samples sharing a timestamp, so each chunk starts at a new timestamp.
fn chunk_bounds(samples: &[Sample], chunk_size: usize) -> Vec<(usize, usize)> {
    let len = samples.len();
    let mut bounds = Vec::with_capacity(len / chunk_size.max(1) + 1);
    let mut start = 0;
    while start < len {
        let mut end = (start + chunk_size.max(1)).min(len);
        while end < len && samples[end].timestamp == samples[end - 1].timestamp {
            end += 1;
        }
        bounds.push((start, end));
        start = end;
    }
    bounds
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Collapse runs of equal timestamps to one sample: the one that moves
/// furthest from the previous distinct value, ties going to the larger value.
fn dedup_timestamps(chunk: &[Sample], preceding: Option<Sample>) -> Vec<Sample> {
    let mut out = Vec::with_capacity(chunk.len());
    let Some(first) = chunk.first() else { return out };
    let mut reference = preceding.map_or(first.value, |p| p.value);

    let mut i = 0;
    while i < chunk.len() {
        let ts = chunk[i].timestamp;
        let mut best = chunk[i];
        let mut best_diff = (best.value - reference).abs();
        let mut j = i + 1;
        while j < chunk.len() && chunk[j].timestamp == ts {
            let cand = chunk[j];
            let diff = (cand.value - reference).abs();
            if diff > best_diff || (diff == best_diff && cand.value > best.value) {
                best = cand;
                best_diff = diff;
            }
            j += 1;
        }
        out.push(best);
        reference = best.value;
        i = j;
    }
    out
}

/// Incoming gradient magnitude. Non-increasing time and NaN map to +inf so
/// the sample is never dropped.
#[inline]
fn gradient_magnitude(prev: &Sample, cur: &Sample) -> f64 {
    let dt = cur.timestamp - prev.timestamp;
    if dt <= 0 { return f64::INFINITY; }
    let g = ((cur.value - prev.value) / dt as f64).abs();
    if g.is_nan() { f64::INFINITY } else { g }
}

/// Reduce one chunk to roughly `budget` samples. First and last sample of
/// the chunk are always kept.
pub fn filter_chunk(chunk: &[Sample], preceding: Option<Sample>, budget: usize) -> Vec<Sample> {
    let working = dedup_timestamps(chunk, preceding);
    let n = working.len();
    if n <= 2 { return working; }

    let magnitudes: Vec<f64> = working.windows(2).map(|w| gradient_magnitude(&w[0], &w[1])).collect();
    // magnitudes[i - 1] belongs to working[i]
    let mut ranked: Vec<f64> = magnitudes[..n - 2]
        .iter()
        .copied()
        .filter(|g| *g > 0.0 && g.is_finite())
        .collect();
    ranked.sort_by(f64::total_cmp);

    let tolerance_for = |keep: usize| -> f64 {
        if ranked.len() <= keep { 0.0 } else { ranked[ranked.len() - keep - 1] }
    };

    let emit = |tolerance: f64| -> Vec<Sample> {
        let mut out = Vec::with_capacity(budget.min(n));
        out.push(working[0]);
        let mut corner: Option<Sample> = None;
        for idx in 1..n - 1 {
            let g = magnitudes[idx - 1];
            if g.is_infinite() || g > tolerance {
                if let Some(c) = corner.take() { out.push(c); }
                out.push(working[idx]);
            } else {
                corner = Some(working[idx]);
            }
        }
        out.push(working[n - 1]);
        out
    };

    let keep = budget.saturating_sub(2);
    let out = emit(tolerance_for(keep));
    if out.len() <= budget || keep == 0 { return out; }
    // corners pushed us over; each kept sample brings at most one corner
    emit(tolerance_for(keep / 2))
}
