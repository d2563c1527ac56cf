mod decision;
mod engine;
mod scorer;
mod store;

pub use decision::{
    like_weight, retweet_weight, thread_gate, DecisionEngine, EngagementDecision,
};
pub use engine::{EngineSettings, ReplyEngine};
pub use scorer::score;
pub use store::{Deduplicator, HistoryStore, MemoryDeduplicator, MemoryHistory};

use serde::{Deserialize, Serialize};

/// One intended outbound action, returned to the caller whether or not the
/// delivery succeeded. Content reflects intent, not delivery confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub post_id: String,
    pub account_id: i64,
    pub content: String,
    pub persona: String,
    pub kind: ActionKind,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionKind {
    Reply,
    Like,
    Retweet,
}

/// One delivery attempt in the ordered dispatch list. Attempts are
/// aggregated without short-circuiting: a failure is captured here and never
/// aborts the attempts that follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionAttempt {
    pub kind: ActionKind,
    pub label: String,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Delivered,
    Failed(String),
    RateLimited,
    /// Posting disabled, no gateway attached, or a segment that is by design
    /// never auto-posted.
    Skipped,
}

impl AttemptOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Failed(_) => "failed",
            Self::RateLimited => "rate_limited",
            Self::Skipped => "skipped",
        }
    }
}
