//! Async wrapper around [`SocialPulse`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every pipeline call on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client waits on LunarCrush.
//!
//! # Example
//!
//! ```no_run
//! use btc_social_pulse::AsyncSocialPulse;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pulse = AsyncSocialPulse::builder().token("lc-token").build().await.unwrap();
//!
//!     let report = pulse.social_data("24h").await.unwrap();
//!     let posts = pulse.posts().await.unwrap();
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::client::{LunarCrushClient, SocialSource};
use crate::config::{FallbackPolicy, Settings};
use crate::error::{Result, SocialPulseError};
use crate::models::{FormattedPost, SocialReport};
use crate::trend::TrendRule;
use crate::{SocialPulse, SocialPulseBuilder};

// ---------------------------------------------------------------------------
// AsyncSocialPulseBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSocialPulse`] instance.
#[derive(Debug, Clone, Default)]
pub struct AsyncSocialPulseBuilder {
    inner: SocialPulseBuilder,
}

impl AsyncSocialPulseBuilder {
    /// Start from process settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            inner: SocialPulseBuilder::from_settings(settings),
        }
    }

    /// Set the LunarCrush bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.token(token);
        self
    }

    /// Set the API base URL.
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.inner = self.inner.api_base(base);
        self
    }

    /// Set the upstream field read as the mention count.
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.inner = self.inner.metric(metric);
        self
    }

    /// Set the empty-data fallback policy.
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.inner = self.inner.fallback(fallback);
        self
    }

    /// Set the trend classification rule.
    pub fn trend_rule(mut self, rule: TrendRule) -> Self {
        self.inner = self.inner.trend_rule(rule);
        self
    }

    /// Set the upstream request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Build the async pipeline over a [`LunarCrushClient`].
    ///
    /// The blocking HTTP client is constructed on the blocking thread pool,
    /// since it cannot be created inside an async context.
    pub async fn build(self) -> Result<AsyncSocialPulse> {
        let pulse = tokio::task::spawn_blocking(move || self.inner.build())
            .await
            .map_err(join_error)??;
        Ok(AsyncSocialPulse {
            inner: Arc::new(pulse),
        })
    }

    /// Build the async pipeline over an arbitrary source.
    pub fn build_with_source<S>(self, source: S) -> AsyncSocialPulse<S>
    where
        S: SocialSource + Send + Sync + 'static,
    {
        AsyncSocialPulse {
            inner: Arc::new(self.inner.build_with_source(source)),
        }
    }
}

// ---------------------------------------------------------------------------
// AsyncSocialPulse
// ---------------------------------------------------------------------------

/// Async wrapper around [`SocialPulse`].
///
/// Cheap to clone; clones share the same pipeline. Calls dispatch to the
/// blocking thread pool. If the awaiting future is dropped the upstream call
/// still finishes in the background and its result is discarded.
pub struct AsyncSocialPulse<S = LunarCrushClient> {
    inner: Arc<SocialPulse<S>>,
}

impl<S> Clone for AsyncSocialPulse<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AsyncSocialPulse<LunarCrushClient> {
    /// Create a new builder for configuring the async pipeline.
    pub fn builder() -> AsyncSocialPulseBuilder {
        AsyncSocialPulseBuilder::default()
    }
}

impl<S> AsyncSocialPulse<S>
where
    S: SocialSource + Send + Sync + 'static,
{
    /// Run a sync pipeline operation on the blocking thread pool.
    ///
    /// The closure receives a `&SocialPulse` reference and should return a
    /// `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SocialPulse<S>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pulse = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&pulse))
            .await
            .map_err(join_error)?
    }

    /// Aggregated report for an interval symbol, ending now.
    pub async fn social_data(&self, interval: &str) -> Result<SocialReport> {
        let interval = interval.to_string();
        self.run(move |p| p.social_data(&interval)).await
    }

    /// Aggregated report for an interval symbol, ending at `now`.
    pub async fn social_data_at(&self, interval: &str, now: i64) -> Result<SocialReport> {
        let interval = interval.to_string();
        self.run(move |p| p.social_data_at(&interval, now)).await
    }

    /// Recent posts split into regular and influencer creators.
    pub async fn posts(&self) -> Result<Vec<FormattedPost>> {
        self.run(|p| p.posts()).await
    }

    /// Borrow the wrapped pipeline.
    pub fn pipeline(&self) -> &SocialPulse<S> {
        &self.inner
    }
}

fn join_error(e: tokio::task::JoinError) -> SocialPulseError {
    SocialPulseError::Runtime(format!("Task join error: {e}"))
}
