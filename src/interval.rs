//! Maps interval symbols (`1h`, `7h`, `24h`) to a concrete time window and
//! bucket width.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SocialPulseError};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// Supported request intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    OneHour,
    SevenHours,
    OneDay,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::OneHour, Interval::SevenHours, Interval::OneDay];

    /// Parse an interval symbol, rejecting anything outside [`Interval::ALL`].
    pub fn parse(symbol: &str) -> Result<Self> {
        match symbol {
            "1h" => Ok(Interval::OneHour),
            "7h" => Ok(Interval::SevenHours),
            "24h" => Ok(Interval::OneDay),
            other => Err(SocialPulseError::InvalidInterval(format!(
                "'{other}' is not supported. Must be 1h, 7h, or 24h."
            ))),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Interval::OneHour => "1h",
            Interval::SevenHours => "7h",
            Interval::OneDay => "24h",
        }
    }

    /// Seconds of history fetched for this interval.
    ///
    /// `1h` looks back two hours so there are always at least two buckets
    /// to compare.
    pub fn lookback(&self) -> i64 {
        match self {
            Interval::OneHour => 2 * HOUR,
            Interval::SevenHours => 7 * HOUR,
            Interval::OneDay => 24 * HOUR,
        }
    }

    /// Width of one aggregation bucket in seconds.
    pub fn bucket_width(&self) -> i64 {
        match self {
            Interval::OneHour => 2 * MINUTE,
            Interval::SevenHours => 4 * MINUTE,
            Interval::OneDay => 8 * MINUTE,
        }
    }

    /// Resolve the window ending at `now` (unix seconds).
    pub fn resolve(&self, now: i64) -> Window {
        Window {
            start: now.saturating_sub(self.lookback()),
            end: now,
            bucket_width: self.bucket_width(),
        }
    }
}

impl FromStr for Interval {
    type Err = SocialPulseError;

    fn from_str(s: &str) -> Result<Self> {
        Interval::parse(s)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Parse `symbol` and resolve it against `now` in one step.
pub fn resolve(symbol: &str, now: i64) -> Result<Window> {
    Ok(Interval::parse(symbol)?.resolve(now))
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A resolved request window `[start, end)` split into fixed-width buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub end: i64,
    pub bucket_width: i64,
}

impl Window {
    /// Number of buckets covering the window; the last one may overhang `end`.
    pub fn bucket_count(&self) -> usize {
        if self.end <= self.start || self.bucket_width <= 0 {
            return 0;
        }
        let span = self.end.abs_diff(self.start);
        span.div_ceil(self.bucket_width as u64) as usize
    }

    /// Iterate the half-open buckets `[t, t + width)` for `t` in
    /// `start, start + width, ...` while `t < end`.
    pub fn buckets(&self) -> impl Iterator<Item = Bucket> + '_ {
        (0..self.bucket_count()).map(move |i| {
            let offset = i as i128 * self.bucket_width as i128;
            let start =
                (self.start as i128 + offset).clamp(i64::MIN as i128, i64::MAX as i128) as i64;
            Bucket {
                start,
                end: start.saturating_add(self.bucket_width),
            }
        })
    }
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub start: i64,
    pub end: i64,
}

impl Bucket {
    pub fn contains(&self, time: i64) -> bool {
        time >= self.start && time < self.end
    }
}

/// Current time in unix seconds.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
