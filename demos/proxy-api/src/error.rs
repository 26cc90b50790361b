use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use btc_social_pulse::SocialPulseError;
use serde_json::json;

pub const INTERVAL_HELP: &str = "Invalid or missing interval. Must be 1h, 7h, or 24h.";
pub const RATE_LIMITED: &str = "Rate limit exceeded. Please try again later.";

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<SocialPulseError> for AppError {
    fn from(e: SocialPulseError) -> Self {
        if let SocialPulseError::InvalidInterval(reason) = &e {
            tracing::warn!(%reason, "rejected interval");
            return AppError::bad_request(INTERVAL_HELP);
        }

        tracing::error!(error = %e, "request failed");
        match e {
            ref err if err.is_rate_limited() => AppError {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: RATE_LIMITED.to_string(),
            },
            SocialPulseError::Upstream { status, message } => {
                let status = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                AppError { status, message }
            }
            SocialPulseError::NoValidData(msg) => AppError::internal(msg),
            other => AppError::internal(other.to_string()),
        }
    }
}
