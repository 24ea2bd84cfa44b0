use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status along with the model the runtime is serving.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let status = if state.model.is_running() {
        "ok"
    } else {
        "shutting_down"
    };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interviewer-api",
        "model": state.model.model_name(),
    }))
}
