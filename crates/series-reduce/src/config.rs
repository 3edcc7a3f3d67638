// File: crates/series-reduce/src/config.rs
// Summary: Engine tuning knobs and per-invocation compute parameters.

use crate::simplify::SimplifierKind;
use crate::smooth::{Granularity, SmoothingType};

/// Chunks smaller than this are never split off into their own task.
pub const MIN_CHUNK_SIZE: usize = 20_000;

/// Engine-wide settings. Built once and shared by every call.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Worker threads of the gradient pool (default: num_cpus).
    pub workers: usize,
    /// Minimum samples per gradient chunk.
    pub min_chunk_size: usize,
    /// Above `workers * series_per_worker` series, a series is no longer split into chunks.
    pub series_per_worker: usize,
    /// Upper bound of distance tolerance escalation rounds.
    pub max_distance_rounds: u32,
    /// First distance tolerance; multiplied by 10 each round.
    pub initial_distance_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            min_chunk_size: MIN_CHUNK_SIZE,
            series_per_worker: 20,
            max_distance_rounds: 12,
            initial_distance_tolerance: 0.01,
        }
    }
}

impl EngineConfig {
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n.max(1);
        self
    }

    pub fn with_min_chunk_size(mut self, size: usize) -> Self {
        self.min_chunk_size = size.max(2);
        self
    }

    pub fn with_max_distance_rounds(mut self, rounds: u32) -> Self {
        self.max_distance_rounds = rounds.max(1);
        self
    }
}

/// What one `Engine::compute` call should do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputeParams {
    /// Total sample budget over all series; 0 collapses to value changes, negative disables reduction.
    pub threshold: i64,
    pub smoothing: SmoothingType,
    pub granularity: Granularity,
    pub simplifier: SimplifierKind,
}

impl Default for ComputeParams {
    fn default() -> Self {
        Self {
            threshold: 10_000,
            smoothing: SmoothingType::None,
            granularity: Granularity::Auto,
            simplifier: SimplifierKind::Gradient,
        }
    }
}

impl ComputeParams {
    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingType, granularity: Granularity) -> Self {
        self.smoothing = smoothing;
        self.granularity = granularity;
        self
    }

    pub fn with_simplifier(mut self, simplifier: SimplifierKind) -> Self {
        self.simplifier = simplifier;
        self
    }
}
