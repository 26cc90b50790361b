//! Reshaping of the upstream post feed into a balanced, normalized list.
//!
//! Posts are split by creator follower count into regular users and
//! influencers, up to [`PER_AUDIENCE_LIMIT`] are taken from each (regular
//! first), the total is capped at [`TOTAL_LIMIT`], and every record is
//! normalized to a [`FormattedPost`] with fixed defaults.

use serde_json::{Number, Value};

use crate::models::{FormattedPost, PostAudience};

/// Creators above this follower count are influencers.
pub const INFLUENCER_FOLLOWERS: f64 = 10_000.0;
pub const PER_AUDIENCE_LIMIT: usize = 10;
pub const TOTAL_LIMIT: usize = 20;

pub const DEFAULT_AVATAR: &str = "https://default-avatar.png";
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";
pub const DEFAULT_CREATOR_NAME: &str = "unknown";
pub const DEFAULT_TITLE: &str = "No content available";

/// Classify a post by follower count.
///
/// An explicit `null` count is a regular creator with zero followers. Posts
/// where the field is absent or not a number have no audience and are left
/// out of the feed.
pub fn audience(post: &Value) -> Option<PostAudience> {
    let followers = match post.get("creator_followers")? {
        Value::Null => 0.0,
        other => other.as_f64()?,
    };
    if followers > INFLUENCER_FOLLOWERS {
        Some(PostAudience::Influencer)
    } else {
        Some(PostAudience::Regular)
    }
}

/// Select and normalize posts for the frontend feed.
pub fn reshape(posts: &[Value]) -> Vec<FormattedPost> {
    let pick = |wanted: PostAudience| {
        posts
            .iter()
            .filter(move |p| audience(p) == Some(wanted))
            .take(PER_AUDIENCE_LIMIT)
    };

    pick(PostAudience::Regular)
        .chain(pick(PostAudience::Influencer))
        .take(TOTAL_LIMIT)
        .map(format_post)
        .collect()
}

/// Normalize a single upstream post, applying defaults for missing fields.
pub fn format_post(post: &Value) -> FormattedPost {
    let creator_name = text(post, "creator_name");
    let name = creator_name.unwrap_or(DEFAULT_CREATOR_NAME);

    let post_link = match text(post, "post_link") {
        Some(link) => link.to_string(),
        None => {
            let post_id = match post.get("post_id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            };
            format!("https://x.com/{name}/status/{post_id}")
        }
    };

    FormattedPost {
        creator_avatar: text(post, "creator_avatar")
            .unwrap_or(DEFAULT_AVATAR)
            .to_string(),
        creator_display_name: text(post, "creator_display_name")
            .or(creator_name)
            .unwrap_or(DEFAULT_DISPLAY_NAME)
            .to_string(),
        creator_name: name.to_string(),
        creator_followers: followers(post),
        post_title: text(post, "post_title")
            .or_else(|| text(post, "body"))
            .unwrap_or(DEFAULT_TITLE)
            .to_string(),
        post_link,
    }
}

/// Upstream follower count as sent, or `0` when missing, null or negative.
fn followers(post: &Value) -> Number {
    match post.get("creator_followers") {
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f > 0.0) => n.clone(),
        _ => Number::from(0u64),
    }
}

/// Non-empty string field, treating `""` the same as absent.
fn text<'a>(post: &'a Value, key: &str) -> Option<&'a str> {
    post.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}
