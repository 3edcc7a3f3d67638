// File: crates/series-reduce/src/lib.rs
// Summary: Library entry point; exports the reduction engine, simplifiers and smoothers.

pub mod types;
pub mod series;
pub mod error;
pub mod config;
pub mod cancel;
pub mod geometry;
pub mod simplify;
pub mod smooth;
pub mod pipeline;

pub use types::Sample;
pub use series::{total_samples, Series};
pub use error::{ReduceError, Result};
pub use config::{ComputeParams, EngineConfig};
pub use cancel::CancelToken;
pub use simplify::{build_simplifier, Simplifier, SimplifierKind};
pub use simplify::{DistanceSimplifier, GradientSimplifier, LineGradientSimplifier, ValueChangeSimplifier};
pub use smooth::{resolve_smoother, Aggregation, CalendarIndex, Granularity, Smoother, SmoothingType};
pub use pipeline::Engine;
