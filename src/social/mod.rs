mod dry_run;
mod traits;

pub use dry_run::DryRunGateway;
pub use traits::SocialGateway;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inbound post event as delivered by the platform stream.
///
/// Immutable value; the engine never mutates it. `engagement_score` is an
/// optional upstream hint and is distinct from the score the engine computes
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_handle: String,
    pub text: String,
    #[serde(default)]
    pub author_follower_count: u64,
    #[serde(default)]
    pub author_verified: bool,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub favorite_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
}
