use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use common::{Bar, BarSource, Notifier, Signal};
use strategy::Strategy;

const DEFAULT_WARMUP: Duration = Duration::from_secs(5);
const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Handle retained by the shell so shutdown can stop the poller and wait
/// for it to finish.
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Request cancellation and await the task. Any in-flight request is
    /// dropped.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "Poller task ended abnormally");
        }
    }
}

/// Drives the fetch → detect → notify cycle over the configured pairs.
pub struct Poller {
    pairs: Vec<String>,
    source: Arc<dyn BarSource>,
    strategy: Arc<dyn Strategy>,
    notifier: Arc<dyn Notifier>,
    warmup: Duration,
    check_interval: Duration,
}

impl Poller {
    pub fn new(
        pairs: Vec<String>,
        source: Arc<dyn BarSource>,
        strategy: Arc<dyn Strategy>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pairs,
            source,
            strategy,
            notifier,
            warmup: DEFAULT_WARMUP,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    pub fn with_timing(mut self, warmup: Duration, check_interval: Duration) -> Self {
        self.warmup = warmup;
        self.check_interval = check_interval;
        self
    }

    /// Spawn the loop on the runtime and hand back its handle.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        PollerHandle { shutdown_tx, task }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            pairs = ?self.pairs,
            strategy = %self.strategy.name(),
            warmup_secs = self.warmup.as_secs(),
            interval_secs = self.check_interval.as_secs(),
            "Poller starting"
        );

        if !pause(self.warmup, &mut shutdown).await {
            info!("Poller stopped during warm-up");
            return;
        }

        loop {
            tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => break,
                sent = self.run_cycle() => debug!(sent, "Cycle complete"),
            }

            if !pause(self.check_interval, &mut shutdown).await {
                break;
            }
        }

        info!("Poller stopped");
    }

    /// Evaluate every pair once, in configured order. Returns the number of
    /// notifications sent.
    pub async fn run_cycle(&self) -> usize {
        let mut sent = 0;

        for pair in &self.pairs {
            let Some(bars) = self.source.fetch(pair).await else {
                debug!(pair = %pair, "No data this cycle");
                continue;
            };

            let signal = self.strategy.evaluate(&bars);
            info!(pair = %pair, signal = %signal, bars = bars.len(), "Evaluated pair");

            if signal.is_actionable() {
                let message = format_alert(pair, signal, bars.first(), self.strategy.name());
                self.notifier.notify(&message).await;
                sent += 1;
            }
        }

        sent
    }
}

/// Alert text for a fired signal. `latest` is the newest bar, if known.
pub fn format_alert(pair: &str, signal: Signal, latest: Option<&Bar>, strategy: &str) -> String {
    match latest {
        Some(bar) => {
            let when = bar
                .datetime
                .map(|dt| format!(" {}", dt.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default();
            format!("{pair}{when} CLOSE {} => {signal} ({strategy})", bar.close)
        }
        None => format!("{pair} => {signal} ({strategy})"),
    }
}

/// Sleep for `duration`. Returns `false` if shutdown was requested first.
async fn pause(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        biased;
        _ = stopped(shutdown) => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender also counts as shutdown.
    let _ = shutdown.wait_for(|stop| *stop).await;
}
