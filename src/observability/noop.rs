use super::traits::{Observer, ObserverEvent, ObserverMetric};

/// Discards everything. Default when observability is disabled.
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn record_event(&self, _event: &ObserverEvent) {}

    fn record_metric(&self, _metric: &ObserverMetric) {}

    fn name(&self) -> &str {
        "noop"
    }
}
