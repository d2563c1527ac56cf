use super::traits::{Observer, ObserverEvent, ObserverMetric};
use std::sync::atomic::{AtomicU64, Ordering};

/// Tracing-backed observer: structured log line per event, counters for the
/// flush summary.
pub struct LogObserver {
    events: AtomicU64,
    errors: AtomicU64,
}

impl LogObserver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for LogObserver {
    fn record_event(&self, event: &ObserverEvent) {
        self.events.fetch_add(1, Ordering::Relaxed);
        match event {
            ObserverEvent::PostProcessed {
                post_id,
                persona,
                score,
                actions,
            } => {
                tracing::info!(%post_id, %persona, score, actions, "post processed");
            }
            ObserverEvent::DuplicateSkipped { post_id } => {
                tracing::debug!(%post_id, "duplicate post skipped");
            }
            ObserverEvent::PersonaMissing { post_id } => {
                tracing::warn!(%post_id, "no persona available, skipping post");
            }
            ObserverEvent::EngagementDeclined { post_id, score } => {
                tracing::debug!(%post_id, score, "score below engage threshold");
            }
            ObserverEvent::ActionAttempted {
                post_id,
                label,
                outcome,
            } => {
                tracing::info!(%post_id, %label, %outcome, "action attempt");
            }
            ObserverEvent::GenerationFallback { post_id, scope } => {
                tracing::warn!(%post_id, %scope, "generation failed, using fallback content");
            }
            ObserverEvent::Error { component, message } => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                tracing::error!(%component, %message, "engine error");
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::ProcessedTotal(n) => {
                tracing::debug!(processed_total = n, "metric");
            }
            ObserverMetric::RateRemaining(n) => {
                tracing::debug!(rate_remaining = n, "metric");
            }
            ObserverMetric::ActionsDelivered(n) => {
                tracing::debug!(actions_delivered = n, "metric");
            }
        }
    }

    fn flush(&self) {
        tracing::debug!(
            events_total = self.events.load(Ordering::Relaxed),
            errors_total = self.errors.load(Ordering::Relaxed),
            "observer.log.flush"
        );
    }

    fn name(&self) -> &str {
        "log"
    }
}
