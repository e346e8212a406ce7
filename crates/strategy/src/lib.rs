#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod indicators;
pub mod sweep;

pub use sweep::{detect, SweepMomentum, MIN_BARS};

use common::{Bar, Signal};

/// All strategy implementations must satisfy this trait.
pub trait Strategy: Send + Sync {
    /// Human-readable name, reported by the status endpoint and in alerts.
    fn name(&self) -> &str;

    /// Evaluate a newest-first bar sequence for one pair.
    ///
    /// Must be pure: the same bars always give the same signal.
    fn evaluate(&self, bars: &[Bar]) -> Signal;
}
