use async_trait::async_trait;

use crate::Bar;

/// Source of recent bars for a pair.
///
/// `TwelveDataClient` implements this against the live provider. The poller
/// only ever sees this trait, so tests swap in canned bar sets.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Fetch the latest bars for `pair`, newest first.
    ///
    /// Returns `None` when nothing usable came back. Implementations log the
    /// cause themselves and never surface an error to the caller.
    async fn fetch(&self, pair: &str) -> Option<Vec<Bar>>;
}

/// Best-effort outbound message channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`. Failures are swallowed by the implementation.
    async fn notify(&self, message: &str);
}
