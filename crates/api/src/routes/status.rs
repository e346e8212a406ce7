use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn status_router() -> Router<AppState> {
    Router::new().route("/", get(status))
}

/// Liveness probe for the host. Always "running" while the process is up;
/// upstream provider health is not reflected here.
async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "pairs": state.pairs.as_slice(),
        "strategy": state.strategy,
    }))
}
