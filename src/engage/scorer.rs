use crate::social::Post;
use chrono::{DateTime, Duration, Utc};

const BASELINE: i64 = 50;
const FOLLOWER_THRESHOLD: u64 = 10_000;
const RETWEET_THRESHOLD: u64 = 10;
const FAVORITE_THRESHOLD: u64 = 50;

/// Desirability score for a post, 0–100.
///
/// Pure function of the post's fields and `now`: baseline 50, additive
/// adjustments, clamped once at the end. The age buckets are mutually
/// exclusive — a post in the 6–24h band gets no age adjustment.
#[must_use]
pub fn score(post: &Post, now: DateTime<Utc>) -> u8 {
    let mut score = BASELINE;

    if post.author_verified {
        score += 20;
    }
    if post.author_follower_count > FOLLOWER_THRESHOLD {
        score += 15;
    }
    if post.retweet_count > RETWEET_THRESHOLD {
        score += 10;
    }
    if post.favorite_count > FAVORITE_THRESHOLD {
        score += 10;
    }
    if post.text.contains('?') {
        score += 5;
    }

    let age = now.signed_duration_since(post.created_at);
    if age < Duration::hours(6) {
        score += 10;
    } else if age > Duration::hours(24) {
        score -= 10;
    }

    u8::try_from(score.clamp(0, 100)).unwrap_or(0)
}
