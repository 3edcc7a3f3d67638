// File: crates/series-reduce/src/cancel.rs
// Summary: Cooperative cancellation flag checked between reduction rounds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ReduceError, Result};

/// Cloneable handle; all clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.flag.store(true, Ordering::Release); }

    pub fn is_cancelled(&self) -> bool { self.flag.load(Ordering::Acquire) }

    /// Err(Interrupted) once `cancel` has been called on any clone.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() { Err(ReduceError::Interrupted) } else { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());
        other.cancel();
        assert!(matches!(token.check(), Err(ReduceError::Interrupted)));
    }
}
