use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use btc_social_pulse::SocialReport;
use serde::Deserialize;

use crate::error::{AppError, INTERVAL_HELP};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SocialDataParams {
    pub interval: Option<String>,
}

/// GET /api/social-data?interval=1h|7h|24h
///
/// Bitcoin mention counts averaged into fixed-width buckets, with a
/// bullish/bearish trend from the last two buckets.
pub async fn get_social_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SocialDataParams>,
) -> Result<Json<SocialReport>, AppError> {
    let interval = params
        .interval
        .ok_or_else(|| AppError::bad_request(INTERVAL_HELP))?;

    let report = state.pulse.social_data(&interval).await?;
    if report.degraded {
        tracing::warn!(%interval, "serving synthetic placeholder data");
    }
    Ok(Json(report))
}
