//! Liquidity sweep + candle momentum + moving-average trend filter.

use tracing::trace;

use common::{Bar, Signal};

use crate::indicators::sma;
use crate::Strategy;

/// Minimum history needed before the detector will emit anything.
pub const MIN_BARS: usize = 50;

const FAST_PERIOD: usize = 20;
const SLOW_PERIOD: usize = 50;
/// Chronological offset from the end of the bar that defines the prior range.
const SWEEP_LOOKBACK: usize = 3;
/// Body must exceed this share of the latest bar's range.
const MOMENTUM_RATIO: f64 = 0.45;

/// Evaluate a newest-first bar sequence.
///
/// - BUY: the latest bar dips below the low three bars back and closes back
///   above it, the close-to-close body is strong, and the 20-bar mean is above
///   the 50-bar mean.
/// - SELL: the mirror image above the prior high with the means inverted.
///
/// Both means are simple averages of closes. Fewer than [`MIN_BARS`] bars
/// yields `Signal::None`.
pub fn detect(bars: &[Bar]) -> Signal {
    if bars.len() < MIN_BARS {
        return Signal::None;
    }

    let chronological: Vec<Bar> = bars.iter().rev().copied().collect();
    let closes: Vec<f64> = chronological.iter().map(|b| b.close).collect();

    let (Some(fast), Some(slow)) = (sma(&closes, FAST_PERIOD), sma(&closes, SLOW_PERIOD)) else {
        return Signal::None;
    };
    let trend_up = fast > slow;
    let trend_down = fast < slow;

    let n = chronological.len();
    let last = chronological[n - 1];
    let prev = chronological[n - SWEEP_LOOKBACK];

    let sweep_high = last.high > prev.high && last.close < prev.high;
    let sweep_low = last.low < prev.low && last.close > prev.low;

    let body = (closes[n - 1] - closes[n - 2]).abs();
    let strong = strong_momentum(body, last.range());

    trace!(
        fast,
        slow,
        sweep_high,
        sweep_low,
        body,
        strong,
        "sweep-momentum evaluation"
    );

    if sweep_low && strong && trend_up {
        Signal::Buy
    } else if sweep_high && strong && trend_down {
        Signal::Sell
    } else {
        Signal::None
    }
}

/// A flat bar (zero range) never counts as strong.
fn strong_momentum(body: f64, wick: f64) -> bool {
    wick > 0.0 && body > MOMENTUM_RATIO * wick
}

/// The one built-in strategy, wrapping [`detect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepMomentum;

impl SweepMomentum {
    pub const NAME: &'static str = "sweep-momentum";
}

impl Strategy for SweepMomentum {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, bars: &[Bar]) -> Signal {
        detect(bars)
    }
}
