// File: crates/series-reduce/src/pipeline.rs
// Summary: Compute pipeline: optional change-filter, optional smoothing, then the selected simplifier.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::{ComputeParams, EngineConfig};
use crate::error::Result;
use crate::series::{total_samples, Series};
use crate::simplify::{build_simplifier, Simplifier, SimplifierKind};
use crate::smooth::{Smoother, SmoothingType};

/// Holds one instance of every simplifier, indexed by `SimplifierKind`.
/// The gradient pool lives as long as the engine, so build it once and
/// share it between calls.
pub struct Engine {
    config: EngineConfig,
    simplifiers: Vec<Box<dyn Simplifier>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let simplifiers = SimplifierKind::ALL
            .into_iter()
            .map(|kind| build_simplifier(kind, &config))
            .collect::<Result<Vec<_>>>()?;
        debug!(workers = config.workers, "engine ready");
        Ok(Self { config, simplifiers })
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn simplifier(&self, kind: SimplifierKind) -> &dyn Simplifier {
        self.simplifiers[kind.index()].as_ref()
    }

    /// Reduce `series` in place. Names and count of series never change.
    pub fn compute(&self, series: &mut [Series], params: &ComputeParams, cancel: &CancelToken) -> Result<()> {
        cancel.check()?;
        let input = total_samples(series);

        if params.threshold == 0 {
            let t = Instant::now();
            self.simplifier(SimplifierKind::ValueChange).simplify(series, params.threshold, cancel)?;
            info!(elapsed_ms = t.elapsed().as_millis() as u64, after = total_samples(series), "value change filter");
        }

        if params.smoothing != SmoothingType::None {
            let smoother = Smoother::resolve(params.smoothing, params.granularity)?;
            let t = Instant::now();
            series.par_iter_mut().try_for_each(|s| smoother.smooth_series(s))?;
            info!(
                smoothing = %params.smoothing,
                granularity = %params.granularity,
                elapsed_ms = t.elapsed().as_millis() as u64,
                after = total_samples(series),
                "smoothing"
            );
        }

        cancel.check()?;
        let simplifier = self.simplifier(params.simplifier);
        let t = Instant::now();
        simplifier.simplify(series, params.threshold, cancel)?;
        info!(
            simplifier = simplifier.id(),
            threshold = params.threshold,
            input,
            output = total_samples(series),
            elapsed_ms = t.elapsed().as_millis() as u64,
            "simplification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smooth::Granularity;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default().with_workers(2)).unwrap()
    }

    #[test]
    fn zero_threshold_collapses_value_changes() {
        let mut series = vec![Series::from_pairs("s", [(0, 5.0), (1, 5.0), (2, 5.0), (3, 9.0)])];
        let params = ComputeParams::default().with_threshold(0);
        engine().compute(&mut series, &params, &CancelToken::new()).unwrap();
        assert_eq!(series[0], Series::from_pairs("s", [(0, 5.0), (3, 9.0)]));
    }

    #[test]
    fn negative_threshold_only_smooths() {
        let mut series = vec![Series::from_pairs("s", (0..10_000).map(|i| (i, (i % 3) as f64)))];
        let params = ComputeParams::default()
            .with_threshold(-1)
            .with_smoothing(SmoothingType::Sum, Granularity::Seconds);
        engine().compute(&mut series, &params, &CancelToken::new()).unwrap();
        assert_eq!(series[0].len(), 10);
        assert!(series[0].samples.iter().all(|s| s.value == 999.0 || s.value == 1_000.0 || s.value == 1_001.0));
    }

    #[test]
    fn simplifiers_are_indexed_by_kind() {
        let engine = engine();
        for kind in SimplifierKind::ALL {
            assert_eq!(engine.simplifier(kind).id(), kind.name().to_ascii_lowercase());
        }
    }

    #[test]
    fn cancelled_before_start() {
        let mut series = vec![Series::from_pairs("s", (0..10).map(|i| (i, i as f64)))];
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(engine().compute(&mut series, &ComputeParams::default(), &cancel).is_err());
        assert_eq!(series[0].len(), 10);
    }
}
