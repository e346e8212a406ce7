use chrono::NaiveDateTime;

/// One OHLC sample for a fixed interval (1 minute from Twelve Data).
///
/// Bar sequences travel newest first, the way the provider returns them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Provider timestamp of the bar open. `None` if it could not be parsed.
    pub datetime: Option<NaiveDateTime>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            datetime: None,
            open,
            high,
            low,
            close,
        }
    }

    /// Total high-to-low range of the bar.
    pub fn range(&self) -> f64 {
        (self.high - self.low).abs()
    }
}

/// Outcome of one detector evaluation for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}

impl Signal {
    /// True for `Buy` and `Sell`.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::None)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::None => write!(f, "NONE"),
        }
    }
}
