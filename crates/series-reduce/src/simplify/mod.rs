// File: crates/series-reduce/src/simplify/mod.rs
// Summary: Simplifier trait and strategy selector for point-budget reducers.

use std::fmt;
use std::str::FromStr;

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::{ReduceError, Result};
use crate::series::Series;

pub mod distance;
pub mod gradient;
pub mod line_gradient;
pub mod value_change;

pub use distance::DistanceSimplifier;
pub use gradient::GradientSimplifier;
pub use line_gradient::LineGradientSimplifier;
pub use value_change::ValueChangeSimplifier;

/// A reducer shrinks the sample count of a set of series in place.
///
/// `threshold` is the budget over all series together. Implementations
/// never grow a series and keep samples ordered by timestamp.
pub trait Simplifier: Send + Sync {
    fn id(&self) -> &'static str;
    fn simplify(&self, series: &mut [Series], threshold: i64, cancel: &CancelToken) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimplifierKind {
    ValueChange,
    Gradient,
    Distance,
    LineGradient,
}

impl SimplifierKind {
    pub const ALL: [SimplifierKind; 4] =
        [Self::ValueChange, Self::Gradient, Self::Distance, Self::LineGradient];

    /// Position in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            Self::ValueChange => 0,
            Self::Gradient => 1,
            Self::Distance => 2,
            Self::LineGradient => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ValueChange => "VALUE_CHANGE",
            Self::Gradient => "GRADIENT",
            Self::Distance => "DISTANCE",
            Self::LineGradient => "LINE_GRADIENT",
        }
    }
}

impl fmt::Display for SimplifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for SimplifierKind {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReduceError::unsupported("simplifier", s))
    }
}

/// Instantiate the reducer for `kind`. The gradient reducer owns a worker
/// pool, so callers should build once and reuse.
pub fn build_simplifier(kind: SimplifierKind, config: &EngineConfig) -> Result<Box<dyn Simplifier>> {
    Ok(match kind {
        SimplifierKind::ValueChange => Box::new(ValueChangeSimplifier),
        SimplifierKind::Gradient => Box::new(GradientSimplifier::new(config)?),
        SimplifierKind::Distance => Box::new(DistanceSimplifier::new(config)),
        SimplifierKind::LineGradient => Box::new(LineGradientSimplifier),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("gradient".parse::<SimplifierKind>().unwrap(), SimplifierKind::Gradient);
        assert_eq!("LINE_GRADIENT".parse::<SimplifierKind>().unwrap(), SimplifierKind::LineGradient);
        assert!(matches!("gpu".parse::<SimplifierKind>(), Err(ReduceError::Unsupported { .. })));
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, kind) in SimplifierKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn build_returns_matching_ids() {
        let cfg = EngineConfig::default().with_workers(2);
        for kind in SimplifierKind::ALL {
            let s = build_simplifier(kind, &cfg).expect("build");
            assert_eq!(s.id(), kind.name().to_ascii_lowercase());
        }
    }
}
