use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawPoint — Validated upstream time-series sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    /// Unix seconds.
    pub time: i64,
    /// Non-negative, finite metric value.
    pub value: f64,
}

// ---------------------------------------------------------------------------
// AggregatedPoint — One non-empty bucket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    /// Bucket start (unix seconds).
    pub time: i64,
    /// Rounded mean of the samples in the bucket.
    pub mentions: i64,
    /// Difference from the previous point's mentions; 0 for the first point.
    #[serde(default)]
    pub delta: i64,
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Bullish,
    Bearish,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => f.write_str("bullish"),
            Trend::Bearish => f.write_str("bearish"),
        }
    }
}

// ---------------------------------------------------------------------------
// Granularity — Upstream `bucket` parameter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Minute,
    Hour,
}

impl Granularity {
    pub fn as_param(&self) -> &'static str {
        match self {
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
        }
    }

    /// The next coarser granularity, if any.
    pub fn coarser(&self) -> Option<Granularity> {
        match self {
            Granularity::Minute => Some(Granularity::Hour),
            Granularity::Hour => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

// ---------------------------------------------------------------------------
// DataSource — Where a report's numbers came from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Primary query at minute granularity.
    Live,
    /// Real data from the hourly re-query.
    CoarseFallback,
    /// Generated placeholder values; not real measurements.
    Synthetic,
}

// ---------------------------------------------------------------------------
// SocialReport — Response body for one interval request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialReport {
    pub data: Vec<AggregatedPoint>,
    pub trend: Trend,
    pub source: DataSource,
    /// Set only for synthetic reports so consumers can badge or hide them.
    pub degraded: bool,
}

impl SocialReport {
    pub fn new(data: Vec<AggregatedPoint>, trend: Trend, source: DataSource) -> Self {
        Self {
            data,
            trend,
            source,
            degraded: source == DataSource::Synthetic,
        }
    }
}
