use super::{Post, SocialGateway};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stand-in gateway used when no platform credentials are configured.
///
/// Logs every action and reports success, so the full decision/orchestration
/// path can run end-to-end in development. `listen` parks forever: dry runs
/// are driven by posts injected through the control surface or tests, not by
/// a live stream.
pub struct DryRunGateway {
    calls: AtomicU64,
}

impl DryRunGateway {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn record(&self, action: &str, post_id: &str, detail: Option<&str>) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match detail {
            Some(text) => tracing::info!(action, post_id, text, "dry-run gateway call"),
            None => tracing::info!(action, post_id, "dry-run gateway call"),
        }
    }
}

impl Default for DryRunGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialGateway for DryRunGateway {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn listen(&self, _tx: tokio::sync::mpsc::Sender<Post>) -> anyhow::Result<()> {
        tracing::info!("dry-run gateway attached, no inbound stream");
        std::future::pending().await
    }

    async fn post_reply(&self, post_id: &str, text: &str) -> anyhow::Result<()> {
        self.record("reply", post_id, Some(text));
        Ok(())
    }

    async fn like(&self, post_id: &str) -> anyhow::Result<()> {
        self.record("like", post_id, None);
        Ok(())
    }

    async fn retweet(&self, post_id: &str) -> anyhow::Result<()> {
        self.record("retweet", post_id, None);
        Ok(())
    }
}
