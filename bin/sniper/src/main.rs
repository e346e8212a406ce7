use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use api::AppState;
use common::Config;
use engine::{Poller, TwelveDataClient};
use strategy::SweepMomentum;
use telegram_alert::TelegramNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        pairs = ?cfg.pairs,
        port = cfg.port,
        interval_secs = cfg.check_interval.as_secs(),
        telegram = cfg.telegram_enabled(),
        "Sniper starting"
    );
    if cfg.twelvedata_api_key.is_none() {
        warn!("TWELVEDATA_API_KEY is not set; the provider will reject every fetch");
    }
    if !cfg.telegram_enabled() {
        warn!("TELEGRAM_TOKEN / TELEGRAM_CHAT_ID not set; alerts will only be logged");
    }

    // ── Shared HTTP session ───────────────────────────────────────────────────
    let http = reqwest::Client::builder()
        .use_rustls_tls()
        .build()
        .context("failed to build HTTP client")?;

    // ── Poller ────────────────────────────────────────────────────────────────
    let source = Arc::new(TwelveDataClient::new(
        http.clone(),
        cfg.twelvedata_api_key.clone().unwrap_or_default(),
    ));
    let notifier = Arc::new(TelegramNotifier::new(
        http.clone(),
        cfg.telegram_token.clone(),
        cfg.telegram_chat_id.clone(),
    ));
    let poller = Poller::new(cfg.pairs.clone(), source, Arc::new(SweepMomentum), notifier)
        .with_timing(cfg.warmup, cfg.check_interval)
        .spawn();

    // ── Status endpoint (runs until a shutdown signal) ────────────────────────
    let state = AppState::new(cfg.pairs.clone(), SweepMomentum::NAME);
    let served = api::serve(state, cfg.port, shutdown_signal()).await;

    // ── Teardown, on every exit path ─────────────────────────────────────────
    info!("Stopping poller");
    poller.shutdown().await;
    drop(http);

    served.context("status endpoint failed")?;
    info!("Shutdown complete");
    Ok(())
}

/// Resolves on ctrl-c, or SIGTERM from the process supervisor.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}
