// File: crates/series-reduce/src/simplify/value_change.rs
// Summary: Change filter; keeps only samples whose value differs from the last kept one.

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::series::Series;
use crate::simplify::Simplifier;
use crate::types::Sample;

/// Stateless; the threshold is ignored, every series is collapsed to its value changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueChangeSimplifier;

impl Simplifier for ValueChangeSimplifier {
    fn id(&self) -> &'static str { "value_change" }

    fn simplify(&self, series: &mut [Series], _threshold: i64, _cancel: &CancelToken) -> Result<()> {
        for s in series.iter_mut() {
            let kept = collapse_value_changes(&s.samples);
            s.samples = kept;
        }
        Ok(())
    }
}

/// First sample, every value change, and always the final sample so the
/// series still ends at its input end time.
pub fn collapse_value_changes(samples: &[Sample]) -> Vec<Sample> {
    let Some((&last, init)) = samples.split_last() else { return Vec::new() };
    let mut out: Vec<Sample> = Vec::with_capacity(samples.len().min(1024));
    for &s in init {
        match out.last() {
            Some(prev) if prev.value == s.value => {}
            _ => out.push(s),
        }
    }
    out.push(last);
    out
}
