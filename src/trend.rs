//! Bullish/bearish classification from the last two aggregated buckets.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SocialPulseError};
use crate::models::{AggregatedPoint, Trend};

/// Drops at or below this percentage turn a threshold trend bearish.
pub const BEARISH_THRESHOLD_PCT: f64 = -5.0;

// ---------------------------------------------------------------------------
// TrendRule
// ---------------------------------------------------------------------------

/// How a percent change maps to a [`Trend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendRule {
    /// Bullish on any rise, bearish otherwise (including no change).
    SignOnly,
    /// Bullish on any rise, bearish at -5% or worse, bullish in between.
    #[default]
    Threshold,
}

impl TrendRule {
    pub fn classify_change(&self, percent_change: f64) -> Trend {
        if percent_change > 0.0 {
            return Trend::Bullish;
        }
        match self {
            TrendRule::SignOnly => Trend::Bearish,
            TrendRule::Threshold if percent_change <= BEARISH_THRESHOLD_PCT => Trend::Bearish,
            TrendRule::Threshold => Trend::default(),
        }
    }
}

impl FromStr for TrendRule {
    type Err = SocialPulseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sign" | "sign_only" | "strict" => Ok(TrendRule::SignOnly),
            "threshold" => Ok(TrendRule::Threshold),
            other => Err(SocialPulseError::Config(format!(
                "Unknown trend rule '{other}' (expected threshold or sign)"
            ))),
        }
    }
}

impl fmt::Display for TrendRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendRule::SignOnly => f.write_str("sign"),
            TrendRule::Threshold => f.write_str("threshold"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Percent change from `previous` to `latest`; 0 when `previous` is 0.
pub fn percent_change(previous: i64, latest: i64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (latest - previous) as f64 / previous as f64 * 100.0
}

/// Classify a sorted aggregated series by its last two points.
///
/// Series shorter than two points are `bullish`.
pub fn classify(points: &[AggregatedPoint], rule: TrendRule) -> Trend {
    let [.., previous, latest] = points else {
        return Trend::default();
    };
    let change = percent_change(previous.mentions, latest.mentions);
    let trend = rule.classify_change(change);
    let change_pct = format!("{change:.2}%");
    tracing::info!(
        latest = latest.mentions,
        previous = previous.mentions,
        change = %change_pct,
        %trend,
        %rule,
        "trend calculation"
    );
    trend
}
