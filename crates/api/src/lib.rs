pub mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use common::Result;

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub pairs: Arc<Vec<String>>,
    pub strategy: String,
}

impl AppState {
    pub fn new(pairs: Vec<String>, strategy: impl Into<String>) -> Self {
        Self {
            pairs: Arc::new(pairs),
            strategy: strategy.into(),
        }
    }
}

/// The full router: the status route plus CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::status_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind `0.0.0.0:port` and serve until `shutdown` resolves.
///
/// A bind failure is returned immediately so the caller can abort startup.
pub async fn serve<F>(state: AppState, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Status endpoint listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Status endpoint stopped");
    Ok(())
}
