// File: crates/series-reduce/src/simplify/distance.rs
// Summary: Alternate reducer; escalating-tolerance Douglas–Peucker per series.

use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::{douglas_peucker, Coordinate};
use crate::series::{total_samples, Series};
use crate::simplify::Simplifier;
use crate::types::Sample;

#[derive(Clone, Copy, Debug)]
pub struct DistanceSimplifier {
    initial_tolerance: f64,
    max_rounds: u32,
}

impl DistanceSimplifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            initial_tolerance: config.initial_distance_tolerance,
            max_rounds: config.max_distance_rounds.max(1),
        }
    }

    /// Simplify one sample list until it fits `budget` or the rounds run out.
    /// Nothing is written back on cancellation.
    fn reduce(&self, name: &str, samples: &[Sample], budget: usize, cancel: &CancelToken) -> Result<Option<Vec<Sample>>> {
        if samples.len() <= budget { return Ok(None); }

        let mut current = samples.to_vec();
        let mut tolerance = self.initial_tolerance;
        for round in 1..=self.max_rounds {
            cancel.check()?;
            let before = current.len();
            let coords: Vec<Coordinate> = current.iter().map(Coordinate::from).collect();
            let keep = douglas_peucker(&coords, tolerance);
            current = current
                .iter()
                .zip(keep)
                .filter_map(|(s, k)| k.then_some(*s))
                .collect();
            debug!(series = name, round, tolerance, before, after = current.len(), "distance round");
            if current.len() <= budget { break; }
            tolerance *= 10.0;
        }
        Ok(Some(current))
    }
}

impl Default for DistanceSimplifier {
    fn default() -> Self { Self::new(&EngineConfig::default()) }
}

impl Simplifier for DistanceSimplifier {
    fn id(&self) -> &'static str { "distance" }

    fn simplify(&self, series: &mut [Series], threshold: i64, cancel: &CancelToken) -> Result<()> {
        if threshold <= 0 || total_samples(series) as u64 <= threshold as u64 { return Ok(()); }
        let budget = (threshold as f64 / series.len() as f64).round() as usize;

        series.par_iter_mut().try_for_each(|s| -> Result<()> {
            if let Some(reduced) = self.reduce(&s.name, &s.samples, budget, cancel)? {
                s.samples = reduced;
            }
            Ok(())
        })
    }
}
