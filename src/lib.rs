//! Bitcoin social metrics proxy.
//!
//! Fetches Bitcoin time-series and post data from the LunarCrush analytics
//! API, averages the time series into fixed-width buckets for a requested
//! interval, and tags the result with a bullish/bearish trend.
//!
//! # Quick start
//!
//! ```no_run
//! use btc_social_pulse::SocialPulse;
//!
//! let pulse = SocialPulse::builder().token("lc-token").build().unwrap();
//!
//! // Last seven hours in four-minute buckets
//! let report = pulse.social_data("7h").unwrap();
//! println!("{} points, trend {}", report.data.len(), report.trend);
//!
//! // Balanced post feed
//! let posts = pulse.posts().unwrap();
//! ```

pub mod aggregate;
#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod error;
pub mod interval;
pub mod models;
pub mod placeholder;
pub mod posts;
pub mod trend;

#[cfg(feature = "async")]
pub use async_client::AsyncSocialPulse;
pub use client::{LunarCrushClient, SocialSource};
pub use config::{FallbackPolicy, Settings};
pub use error::{Result, SocialPulseError};
pub use interval::{Interval, Window};
pub use models::{AggregatedPoint, DataSource, FormattedPost, Granularity, SocialReport, Trend};
pub use trend::TrendRule;

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// SocialPulseBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SocialPulse`] instance.
///
/// Use [`SocialPulse::builder()`] or [`SocialPulseBuilder::from_settings`],
/// chain configuration methods, and call [`build()`](SocialPulseBuilder::build)
/// for the HTTP-backed pipeline or
/// [`build_with_source()`](SocialPulseBuilder::build_with_source) for any
/// other [`SocialSource`].
#[derive(Debug, Clone)]
pub struct SocialPulseBuilder {
    token: Option<String>,
    api_base: String,
    metric: String,
    fallback: FallbackPolicy,
    trend_rule: TrendRule,
    timeout: Duration,
}

impl Default for SocialPulseBuilder {
    fn default() -> Self {
        Self {
            token: None,
            api_base: config::API_BASE.to_string(),
            metric: config::DEFAULT_METRIC.to_string(),
            fallback: FallbackPolicy::default(),
            trend_rule: TrendRule::default(),
            timeout: config::DEFAULT_TIMEOUT,
        }
    }
}

impl SocialPulseBuilder {
    /// Start from process settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            token: Some(settings.token.clone()),
            api_base: settings.api_base.clone(),
            metric: settings.metric.clone(),
            fallback: settings.fallback,
            trend_rule: settings.trend_rule,
            timeout: settings.timeout,
        }
    }

    /// Set the LunarCrush bearer token. Required for [`build()`](Self::build).
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the API base URL. Defaults to [`config::API_BASE`].
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Set the upstream field read as the mention count.
    ///
    /// Defaults to `social_volume`.
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = metric.into();
        self
    }

    /// Set the policy applied when the primary query has no usable points.
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the trend classification rule.
    pub fn trend_rule(mut self, rule: TrendRule) -> Self {
        self.trend_rule = rule;
        self
    }

    /// Set the upstream request timeout.
    ///
    /// Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the pipeline over a [`LunarCrushClient`].
    pub fn build(self) -> Result<SocialPulse<LunarCrushClient>> {
        let token = self
            .token
            .clone()
            .ok_or_else(|| SocialPulseError::Config("A LunarCrush bearer token is required".into()))?;
        let client = LunarCrushClient::new(token, self.api_base.clone(), self.timeout)?;
        Ok(self.build_with_source(client))
    }

    /// Build the pipeline over an arbitrary source.
    pub fn build_with_source<S: SocialSource>(self, source: S) -> SocialPulse<S> {
        SocialPulse {
            source,
            metric: self.metric,
            fallback: self.fallback,
            trend_rule: self.trend_rule,
        }
    }
}

// ---------------------------------------------------------------------------
// SocialPulse
// ---------------------------------------------------------------------------

/// The request pipeline: interval resolution, upstream query, aggregation,
/// fallback and trend classification.
///
/// Holds no per-request state; every call resolves its own window and
/// re-fetches from the source.
pub struct SocialPulse<S = LunarCrushClient> {
    source: S,
    metric: String,
    fallback: FallbackPolicy,
    trend_rule: TrendRule,
}

impl SocialPulse<LunarCrushClient> {
    /// Create a new builder for configuring the pipeline.
    pub fn builder() -> SocialPulseBuilder {
        SocialPulseBuilder::default()
    }
}

impl<S: SocialSource> SocialPulse<S> {
    /// Aggregated report for an interval symbol, ending now.
    pub fn social_data(&self, interval: &str) -> Result<SocialReport> {
        self.social_data_at(interval, interval::unix_now())
    }

    /// Aggregated report for an interval symbol, ending at `now`.
    ///
    /// An unknown symbol fails with [`SocialPulseError::InvalidInterval`]
    /// before the source is queried.
    pub fn social_data_at(&self, interval: &str, now: i64) -> Result<SocialReport> {
        let interval = Interval::parse(interval)?;
        let window = interval.resolve(now);
        tracing::info!(
            %interval,
            start = window.start,
            end = window.end,
            bucket_width = window.bucket_width,
            "fetching social data"
        );
        self.report_for_window(&window)
    }

    /// Aggregated report for an already-resolved window.
    pub fn report_for_window(&self, window: &Window) -> Result<SocialReport> {
        let primary = Granularity::Minute;
        if let Some(data) = self.aggregate_at(primary, window)? {
            return Ok(self.finish(data, DataSource::Live));
        }

        match self.fallback {
            FallbackPolicy::Coarser => {
                if let Some(coarser) = primary.coarser() {
                    tracing::warn!(granularity = %coarser, "no usable points, retrying coarser");
                    if let Some(data) = self.aggregate_at(coarser, window)? {
                        return Ok(self.finish(data, DataSource::CoarseFallback));
                    }
                }
                Err(SocialPulseError::NoValidData(format!(
                    "No valid mention data available at {} or {} granularity",
                    Granularity::Minute,
                    Granularity::Hour
                )))
            }
            FallbackPolicy::Placeholder => {
                tracing::warn!("no usable points, serving degraded placeholder series");
                Ok(placeholder::placeholder_report(window))
            }
            FallbackPolicy::Fail => Err(SocialPulseError::NoValidData(
                "No valid mention data available.".to_string(),
            )),
        }
    }

    /// Recent posts split into regular and influencer creators.
    pub fn posts(&self) -> Result<Vec<FormattedPost>> {
        let raw = self.source.posts(config::POSTS_FETCH_LIMIT)?;
        let formatted = posts::reshape(&raw);
        tracing::info!(count = formatted.len(), fetched = raw.len(), "returning posts");
        Ok(formatted)
    }

    /// Fetch, validate and bucket at one granularity. `None` when nothing
    /// usable lands inside the window.
    fn aggregate_at(
        &self,
        granularity: Granularity,
        window: &Window,
    ) -> Result<Option<Vec<AggregatedPoint>>> {
        let raw = self
            .source
            .time_series(granularity, window.start, window.end)?;
        let points = aggregate::clean(&raw, &self.metric);
        let data = aggregate::bucketize(window, &points);
        if data.is_empty() {
            tracing::warn!(%granularity, fetched = raw.len(), "no valid mention data after filtering");
            return Ok(None);
        }
        Ok(Some(data))
    }

    fn finish(&self, data: Vec<AggregatedPoint>, source: DataSource) -> SocialReport {
        let trend = trend::classify(&data, self.trend_rule);
        SocialReport::new(data, trend, source)
    }

    // -- Accessors ---------------------------------------------------------

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn trend_rule(&self) -> TrendRule {
        self.trend_rule
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl<S> fmt::Display for SocialPulse<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SocialPulse(metric={}, fallback={}, trend_rule={})",
            self.metric, self.fallback, self.trend_rule
        )
    }
}
