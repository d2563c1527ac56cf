/// Lifecycle events emitted by the engagement engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent {
    /// One full decision pass completed; `actions` counts the records
    /// returned to the caller.
    PostProcessed {
        post_id: String,
        persona: String,
        score: u8,
        actions: usize,
    },
    DuplicateSkipped {
        post_id: String,
    },
    PersonaMissing {
        post_id: String,
    },
    EngagementDeclined {
        post_id: String,
        score: u8,
    },
    /// One delivery attempt from the dispatch list, in order.
    ActionAttempted {
        post_id: String,
        label: String,
        outcome: String,
    },
    /// The generation service failed and the static fallback was used.
    GenerationFallback {
        post_id: String,
        scope: String,
    },
    Error {
        component: String,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverMetric {
    ProcessedTotal(usize),
    RateRemaining(usize),
    ActionsDelivered(usize),
}

/// Dependency-injected logging/metrics collaborator.
///
/// Constructed once and handed to the engine — never a process-wide
/// singleton. Implementations must be cheap: the engine calls these inline
/// on the event path.
pub trait Observer: Send + Sync {
    fn record_event(&self, event: &ObserverEvent);

    fn record_metric(&self, metric: &ObserverMetric);

    fn flush(&self) {}

    fn name(&self) -> &str;
}
