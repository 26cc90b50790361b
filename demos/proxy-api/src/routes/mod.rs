pub mod posts;
pub mod social;

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
///
/// Liveness plus the deployment's fallback policy and trend rule.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "fallback": state.settings.fallback.to_string(),
        "trend_rule": state.settings.trend_rule.to_string(),
    }))
}
