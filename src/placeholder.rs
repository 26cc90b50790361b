//! Synthetic series used by [`FallbackPolicy::Placeholder`](crate::config::FallbackPolicy).
//!
//! The output is random and always tagged [`DataSource::Synthetic`] so it can
//! never pass for real measurements.

use rand::Rng;

use crate::aggregate::annotate_deltas;
use crate::interval::Window;
use crate::models::{AggregatedPoint, DataSource, SocialReport, Trend};

const PLACEHOLDER_BASE: f64 = 100.0;
const PLACEHOLDER_SPREAD: f64 = 50.0;

/// One point per bucket of `window` with mentions in `[100, 150]`.
pub fn placeholder_series<R: Rng>(window: &Window, rng: &mut R) -> Vec<AggregatedPoint> {
    let mut points: Vec<AggregatedPoint> = window
        .buckets()
        .map(|bucket| AggregatedPoint {
            time: bucket.start,
            mentions: (PLACEHOLDER_BASE + rng.gen::<f64>() * PLACEHOLDER_SPREAD).round() as i64,
            delta: 0,
        })
        .collect();
    annotate_deltas(&mut points);
    points
}

/// Degraded report for `window`: synthetic series, trend forced bullish.
pub fn placeholder_report(window: &Window) -> SocialReport {
    let mut rng = rand::thread_rng();
    let data = placeholder_series(window, &mut rng);
    SocialReport::new(data, Trend::Bullish, DataSource::Synthetic)
}
