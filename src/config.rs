//! Endpoint constants and process-level settings.
//!
//! [`Settings`] is built once at startup (from the environment or a dotenv
//! file) and handed to [`SocialPulseBuilder::from_settings`](crate::SocialPulseBuilder::from_settings).
//! Nothing in the pipeline reads the environment on its own.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SocialPulseError};
use crate::trend::TrendRule;

pub const API_BASE: &str = "https://lunarcrush.com/api4";
pub const TIME_SERIES_PATH: &str = "public/coins/1/time-series/v2";
pub const POSTS_PATH: &str = "public/topic/bitcoin/posts/v1";

/// Upstream field read as the mention count of each time-series point.
pub const DEFAULT_METRIC: &str = "social_volume";

/// Number of posts requested from the upstream feed per call.
pub const POSTS_FETCH_LIMIT: usize = 50;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PORT: u16 = 5000;

pub fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://btc-sd-final.vercel.app".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

// ---------------------------------------------------------------------------
// FallbackPolicy
// ---------------------------------------------------------------------------

/// What the pipeline does when the primary query yields no usable points.
///
/// Chosen once per deployment and applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Re-query once at hourly granularity, then fail with `NoValidData`.
    #[default]
    Coarser,
    /// Return a synthetic series tagged `degraded`.
    Placeholder,
    /// Fail with `NoValidData` straight away.
    Fail,
}

impl FromStr for FallbackPolicy {
    type Err = SocialPulseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarser" | "hour" => Ok(FallbackPolicy::Coarser),
            "placeholder" | "synthetic" => Ok(FallbackPolicy::Placeholder),
            "fail" | "none" => Ok(FallbackPolicy::Fail),
            other => Err(SocialPulseError::Config(format!(
                "Unknown fallback policy '{other}' (expected coarser, placeholder or fail)"
            ))),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FallbackPolicy::Coarser => "coarser",
            FallbackPolicy::Placeholder => "placeholder",
            FallbackPolicy::Fail => "fail",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Process-wide configuration: credentials, upstream location, policies and
/// the HTTP surface.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub api_base: String,
    pub metric: String,
    pub fallback: FallbackPolicy,
    pub trend_rule: TrendRule,
    pub timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub port: u16,
}

impl Settings {
    /// Settings with the given token and every other field at its default.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: API_BASE.to_string(),
            metric: DEFAULT_METRIC.to_string(),
            fallback: FallbackPolicy::default(),
            trend_rule: TrendRule::default(),
            timeout: DEFAULT_TIMEOUT,
            allowed_origins: default_allowed_origins(),
            port: DEFAULT_PORT,
        }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings from a dotenv-style `KEY=VALUE` file without touching
    /// the process environment.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let iter = dotenv::from_path_iter(path.as_ref()).map_err(|e| {
            SocialPulseError::Config(format!(
                "Cannot read settings file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) =
                item.map_err(|e| SocialPulseError::Config(format!("Bad settings line: {e}")))?;
            vars.insert(key, value);
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// `LUNARCRUSH_BEARER_TOKEN` is required; everything else falls back to
    /// the defaults in this module. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get("LUNARCRUSH_BEARER_TOKEN").ok_or_else(|| {
            SocialPulseError::Config("LUNARCRUSH_BEARER_TOKEN must be set".to_string())
        })?;
        let mut settings = Settings::with_token(token);

        if let Some(base) = get("LUNARCRUSH_API_BASE") {
            settings.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(metric) = get("SOCIAL_METRIC") {
            settings.metric = metric;
        }
        if let Some(fallback) = get("SOCIAL_FALLBACK") {
            settings.fallback = fallback.parse()?;
        }
        if let Some(rule) = get("SOCIAL_TREND_RULE") {
            settings.trend_rule = rule.parse()?;
        }
        if let Some(secs) = get("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                SocialPulseError::Config(format!("UPSTREAM_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            if secs == 0 {
                return Err(SocialPulseError::Config(
                    "UPSTREAM_TIMEOUT_SECS must be positive".to_string(),
                ));
            }
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(origins) = get("ALLOWED_ORIGINS") {
            settings.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(port) = get("PORT") {
            settings.port = port
                .parse()
                .map_err(|_| SocialPulseError::Config(format!("PORT is not a valid port: {port}")))?;
        }

        Ok(settings)
    }
}
