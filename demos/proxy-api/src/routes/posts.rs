use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/btc-data
///
/// Up to 20 recent Bitcoin posts, balanced between regular creators and
/// influencers.
pub async fn get_posts(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let posts = state.pulse.posts().await?;
    Ok(Json(json!({ "data": posts })))
}
