use serde::{Deserialize, Serialize};
use serde_json::Number;

// ---------------------------------------------------------------------------
// FormattedPost — Normalized post record served to the frontend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedPost {
    pub creator_avatar: String,
    pub creator_display_name: String,
    pub creator_name: String,
    /// Follower count exactly as upstream reported it; fractional counts
    /// are kept.
    pub creator_followers: Number,
    pub post_title: String,
    pub post_link: String,
}

// ---------------------------------------------------------------------------
// PostAudience — Follower-count partition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostAudience {
    Regular,
    Influencer,
}
