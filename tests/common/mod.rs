//! Shared test fixtures for the integration tests.
//!
//! Provides `StubSource`, a scripted [`SocialSource`] that records every call,
//! plus helpers for building upstream time-series points and posts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use btc_social_pulse::{Granularity, Result, SocialPulseError, SocialSource};
use serde_json::{json, Value};

/// Fixed request time used throughout the tests (2024-01-01T00:00:00Z).
pub const NOW: i64 = 1_704_067_200;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    TimeSeries {
        granularity: Granularity,
        start: i64,
        end: i64,
    },
    Posts {
        limit: usize,
    },
}

enum Scripted {
    Data(Vec<Value>),
    Status(u16, String),
}

/// Scripted upstream. Granularities without a script return an empty list.
#[derive(Default)]
pub struct StubSource {
    series: HashMap<Granularity, Scripted>,
    posts: Option<Scripted>,
    calls: Mutex<Vec<Call>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, granularity: Granularity, points: Vec<Value>) -> Self {
        self.series.insert(granularity, Scripted::Data(points));
        self
    }

    pub fn with_series_status(mut self, granularity: Granularity, status: u16, message: &str) -> Self {
        self.series
            .insert(granularity, Scripted::Status(status, message.to_string()));
        self
    }

    pub fn with_posts(mut self, posts: Vec<Value>) -> Self {
        self.posts = Some(Scripted::Data(posts));
        self
    }

    pub fn with_posts_status(mut self, status: u16, message: &str) -> Self {
        self.posts = Some(Scripted::Status(status, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(script: Option<&Scripted>) -> Result<Vec<Value>> {
        match script {
            Some(Scripted::Data(items)) => Ok(items.clone()),
            Some(Scripted::Status(status, message)) => Err(SocialPulseError::Upstream {
                status: Some(*status),
                message: message.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

impl SocialSource for StubSource {
    fn time_series(&self, granularity: Granularity, start: i64, end: i64) -> Result<Vec<Value>> {
        self.calls.lock().unwrap().push(Call::TimeSeries {
            granularity,
            start,
            end,
        });
        Self::answer(self.series.get(&granularity))
    }

    fn posts(&self, limit: usize) -> Result<Vec<Value>> {
        self.calls.lock().unwrap().push(Call::Posts { limit });
        Self::answer(self.posts.as_ref())
    }
}

/// Upstream time-series point carrying `social_volume`.
pub fn point(time: i64, social_volume: f64) -> Value {
    json!({ "time": time, "social_volume": social_volume })
}

/// Upstream post with a creator follower count.
pub fn post(id: u32, followers: u64) -> Value {
    json!({
        "post_id": id.to_string(),
        "creator_name": format!("creator{id}"),
        "creator_display_name": format!("Creator {id}"),
        "creator_avatar": format!("https://avatars.test/{id}.png"),
        "creator_followers": followers,
        "post_title": format!("Post number {id}"),
        "post_link": format!("https://x.com/creator{id}/status/{id}"),
    })
}

/// `count` posts from creators with at most 10,000 followers.
pub fn regular_posts(count: u32) -> Vec<Value> {
    (0..count).map(|i| post(i, 100 + i as u64)).collect()
}

/// `count` posts from creators with more than 10,000 followers.
pub fn influencer_posts(count: u32) -> Vec<Value> {
    (0..count).map(|i| post(1000 + i, 50_000 + i as u64)).collect()
}
