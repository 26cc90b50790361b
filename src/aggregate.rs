//! Validation and fixed-width bucketing of upstream time-series samples.
//!
//! Upstream points arrive as loose JSON objects. [`clean`] keeps the ones with
//! a usable `time` and metric value and sorts them; [`bucketize`] averages
//! them into the buckets of a resolved [`Window`].

use serde_json::Value;

use crate::interval::Window;
use crate::models::{AggregatedPoint, RawPoint};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Extract a [`RawPoint`] from one upstream object, or `None` if unusable.
///
/// The metric must be a finite, non-negative JSON number. `time` must be a
/// finite positive number; fractional seconds are floored.
pub fn validate_point(point: &Value, metric: &str) -> Option<RawPoint> {
    let value = point.get(metric)?.as_f64()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let time = point.get("time")?.as_f64()?;
    if !time.is_finite() || time <= 0.0 {
        return None;
    }
    Some(RawPoint {
        time: time.floor() as i64,
        value,
    })
}

/// Validate every upstream object and return the survivors sorted by time.
pub fn clean(raw: &[Value], metric: &str) -> Vec<RawPoint> {
    let mut points: Vec<RawPoint> = raw
        .iter()
        .filter_map(|p| {
            let parsed = validate_point(p, metric);
            if parsed.is_none() {
                tracing::debug!(point = %p, metric, "dropping invalid data point");
            }
            parsed
        })
        .collect();

    points.sort_by_key(|p| p.time);

    let dropped = raw.len() - points.len();
    if dropped > 0 {
        tracing::warn!(dropped, kept = points.len(), "discarded invalid data points");
    }
    points
}

// ---------------------------------------------------------------------------
// Bucketing
// ---------------------------------------------------------------------------

/// Average sorted `points` into the buckets of `window`.
///
/// Emits one point per non-empty bucket with `mentions` set to the rounded
/// mean, then fills in deltas. Points before `window.start` are ignored.
pub fn bucketize(window: &Window, points: &[RawPoint]) -> Vec<AggregatedPoint> {
    let mut out = Vec::new();
    let mut idx = points.partition_point(|p| p.time < window.start);

    for bucket in window.buckets() {
        let mut sum = 0.0;
        let mut count = 0usize;
        while idx < points.len() && points[idx].time < bucket.end {
            sum += points[idx].value;
            count += 1;
            idx += 1;
        }
        if count > 0 {
            out.push(AggregatedPoint {
                time: bucket.start,
                mentions: (sum / count as f64).round() as i64,
                delta: 0,
            });
        }
    }

    annotate_deltas(&mut out);
    out
}

/// Set each point's `delta` to the change from its predecessor.
pub fn annotate_deltas(points: &mut [AggregatedPoint]) {
    let mut previous: Option<i64> = None;
    for point in points.iter_mut() {
        let mentions = point.mentions;
        point.delta = previous.map_or(0, |prev| mentions.saturating_sub(prev));
        previous = Some(mentions);
    }
}
