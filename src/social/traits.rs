use super::Post;
use async_trait::async_trait;

/// Core platform trait — implement for any social platform that can deliver
/// post events and execute engagement actions.
///
/// Every action method may fail; the engine catches failures at the call
/// site and never lets one action's failure abort the others.
/// Implementations should wrap transport failures in
/// [`crate::error::PlatformError`] so library callers can match on them.
#[async_trait]
pub trait SocialGateway: Send + Sync {
    /// Human-readable gateway name.
    fn name(&self) -> &str;

    /// Start delivering inbound post events (long-running). Implementations
    /// own the transport: reconnection, auth, and filtering by the tracked
    /// accounts/keywords they were configured with.
    async fn listen(&self, tx: tokio::sync::mpsc::Sender<Post>) -> anyhow::Result<()>;

    /// Post `text` as a reply to `post_id`.
    async fn post_reply(&self, post_id: &str, text: &str) -> anyhow::Result<()>;

    async fn like(&self, post_id: &str) -> anyhow::Result<()>;

    async fn retweet(&self, post_id: &str) -> anyhow::Result<()>;

    async fn health_check(&self) -> bool {
        true
    }
}
