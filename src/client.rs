//! Blocking client for the LunarCrush analytics API.
//!
//! [`SocialSource`] is the seam between the request pipeline and the
//! upstream: [`LunarCrushClient`] talks HTTP, tests plug in scripted sources.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::Value;

use crate::config;
use crate::error::{Result, SocialPulseError};
use crate::models::Granularity;

// ---------------------------------------------------------------------------
// SocialSource
// ---------------------------------------------------------------------------

/// Upstream supplier of raw time-series points and posts.
///
/// Both methods return the unwrapped `data` array of the upstream envelope;
/// validation happens downstream.
pub trait SocialSource {
    /// Raw points between `start` and `end` (unix seconds) at `granularity`.
    fn time_series(&self, granularity: Granularity, start: i64, end: i64) -> Result<Vec<Value>>;

    /// Up to `limit` recent posts.
    fn posts(&self, limit: usize) -> Result<Vec<Value>>;
}

impl<S: SocialSource + ?Sized> SocialSource for &S {
    fn time_series(&self, granularity: Granularity, start: i64, end: i64) -> Result<Vec<Value>> {
        (**self).time_series(granularity, start, end)
    }

    fn posts(&self, limit: usize) -> Result<Vec<Value>> {
        (**self).posts(limit)
    }
}

impl<S: SocialSource + ?Sized> SocialSource for Box<S> {
    fn time_series(&self, granularity: Granularity, start: i64, end: i64) -> Result<Vec<Value>> {
        (**self).time_series(granularity, start, end)
    }

    fn posts(&self, limit: usize) -> Result<Vec<Value>> {
        (**self).posts(limit)
    }
}

// ---------------------------------------------------------------------------
// LunarCrushClient
// ---------------------------------------------------------------------------

/// HTTP implementation of [`SocialSource`] authenticated with a bearer token.
pub struct LunarCrushClient {
    client: Client,
    token: String,
    api_base: String,
    time_series_path: String,
    posts_path: String,
}

impl LunarCrushClient {
    /// Create a client for `api_base` with a per-request `timeout`.
    pub fn new(token: impl Into<String>, api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            time_series_path: config::TIME_SERIES_PATH.to_string(),
            posts_path: config::POSTS_PATH.to_string(),
        })
    }

    /// Override the time-series endpoint path (relative to the API base).
    pub fn with_time_series_path(mut self, path: impl Into<String>) -> Self {
        self.time_series_path = path.into();
        self
    }

    /// Override the posts endpoint path (relative to the API base).
    pub fn with_posts_path(mut self, path: impl Into<String>) -> Self {
        self.posts_path = path.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    fn get_data(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>> {
        let url = self.url(path);
        tracing::debug!(%url, ?query, "querying LunarCrush");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .map_err(transport_error)?;

        let body = read_body(resp)?;
        unwrap_envelope(body)
    }
}

impl SocialSource for LunarCrushClient {
    fn time_series(&self, granularity: Granularity, start: i64, end: i64) -> Result<Vec<Value>> {
        let query = [
            ("bucket", granularity.as_param().to_string()),
            ("start", start.to_string()),
            ("end", end.to_string()),
        ];
        self.get_data(&self.time_series_path, &query)
    }

    fn posts(&self, limit: usize) -> Result<Vec<Value>> {
        self.get_data(&self.posts_path, &[("limit", limit.to_string())])
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

fn transport_error(e: reqwest::Error) -> SocialPulseError {
    let message = if e.is_timeout() {
        format!("Request to LunarCrush timed out: {e}")
    } else {
        format!("Failed to reach LunarCrush: {e}")
    };
    tracing::warn!(error = %e, "LunarCrush request failed");
    SocialPulseError::Upstream {
        status: e.status().map(|s| s.as_u16()),
        message,
    }
}

fn read_body(resp: Response) -> Result<Value> {
    let status = resp.status();
    let text = resp.text().map_err(transport_error)?;
    let body: Option<Value> = serde_json::from_str(&text).ok();

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), body = %text, "LunarCrush returned an error status");
        return Err(status_error(status.as_u16(), body.as_ref()));
    }

    body.ok_or_else(|| SocialPulseError::Upstream {
        status: Some(status.as_u16()),
        message: "Malformed JSON from LunarCrush".to_string(),
    })
}

/// Error for a non-2xx upstream response, preferring the body's `error` text.
pub(crate) fn status_error(status: u16, body: Option<&Value>) -> SocialPulseError {
    let message = body
        .and_then(|b| b.get("error"))
        .and_then(|e| e.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            if status == 429 {
                "Rate limit exceeded".to_string()
            } else {
                "Failed to fetch data from LunarCrush.".to_string()
            }
        });
    SocialPulseError::Upstream {
        status: Some(status),
        message,
    }
}

/// Pull the `data` array out of a `{"data": [...]}` envelope.
///
/// A missing or null `data` is an empty result; any other non-array `data`
/// is a malformed payload.
pub(crate) fn unwrap_envelope(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            None | Some(Value::Null) => {
                tracing::warn!("LunarCrush response has no data array");
                Ok(Vec::new())
            }
            Some(other) => Err(SocialPulseError::Upstream {
                status: None,
                message: format!("Unexpected data payload from LunarCrush: {other}"),
            }),
        },
        other => Err(SocialPulseError::Upstream {
            status: None,
            message: format!("Unexpected response shape from LunarCrush: {other}"),
        }),
    }
}
