// File: crates/series-reduce/src/smooth/aggregate.rs
// Summary: Per-bucket reduction functions.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Avg,
    Sum,
    Min,
    Max,
    Median,
    /// Number of raw samples in the bucket.
    Count,
    /// Bucket sum minus the previous bucket's sum (first bucket against 0).
    Diff,
}

impl Aggregation {
    /// Reduce one bucket. `Diff` yields the plain bucket sum here; the
    /// differencing across buckets happens once all buckets are known.
    /// `values` may be reordered.
    pub fn reduce(&self, values: &mut [f64]) -> f64 {
        match self {
            Aggregation::Avg => {
                if values.is_empty() { return f64::NAN; }
                values.iter().sum::<f64>() / values.len() as f64
            }
            Aggregation::Sum | Aggregation::Diff => values.iter().sum(),
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Median => median(values),
            Aggregation::Count => values.len() as f64,
        }
    }
}

/// Median; even-sized input averages the two middle values.
pub fn median(values: &mut [f64]) -> f64 {
    let n = values.len();
    if n == 0 { return f64::NAN; }
    values.sort_by(f64::total_cmp);
    if n % 2 == 0 { (values[n / 2 - 1] + values[n / 2]) / 2.0 } else { values[n / 2] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reductions() {
        let data = [4.0, 1.0, 3.0, 2.0];
        let run = |agg: Aggregation| agg.reduce(&mut data.clone());
        assert_eq!(run(Aggregation::Avg), 2.5);
        assert_eq!(run(Aggregation::Sum), 10.0);
        assert_eq!(run(Aggregation::Min), 1.0);
        assert_eq!(run(Aggregation::Max), 4.0);
        assert_eq!(run(Aggregation::Median), 2.5);
        assert_eq!(run(Aggregation::Count), 4.0);
    }

    #[test]
    fn median_odd() {
        assert_eq!(median(&mut [9.0, -1.0, 5.0]), 5.0);
    }
}
