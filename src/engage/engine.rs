use super::decision::{DecisionEngine, EngagementDecision};
use super::store::{Deduplicator, HistoryStore, MemoryDeduplicator, MemoryHistory};
use super::{ActionAttempt, ActionKind, ActionRecord, AttemptOutcome};
use crate::content::ContentGenerator;
use crate::observability::{NoopObserver, Observer, ObserverEvent, ObserverMetric};
use crate::persona::{Persona, PersonaCatalog};
use crate::social::{Post, SocialGateway};
use crate::utils::{excerpt, RateLimiter};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Engine tuning knobs, usually populated from the config file.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub base_like_rate: f64,
    pub base_retweet_rate: f64,
    pub engage_threshold: u8,
    pub thread_length: usize,
    /// Seed for the gate RNG; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    pub limiter_max_calls: usize,
    pub limiter_window: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_like_rate: 0.3,
            base_retweet_rate: 0.1,
            engage_threshold: 50,
            thread_length: 3,
            rng_seed: None,
            limiter_max_calls: 50,
            limiter_window: Duration::from_secs(15 * 60),
        }
    }
}

enum Delivery<'a> {
    Reply(&'a str),
    Like,
    Retweet,
}

/// Engagement Decision & Execution Engine.
///
/// Owns the processed-set, the engagement history and the outbound rate
/// budget. One decision pass per post, terminal after that pass; no error
/// escapes [`ReplyEngine::process_post`].
pub struct ReplyEngine {
    catalog: RwLock<PersonaCatalog>,
    decider: DecisionEngine,
    dedup: Box<dyn Deduplicator>,
    history: Box<dyn HistoryStore>,
    generator: Arc<dyn ContentGenerator>,
    gateway: Option<Arc<dyn SocialGateway>>,
    limiter: RateLimiter,
    observer: Arc<dyn Observer>,
    thread_length: usize,
}

impl ReplyEngine {
    #[must_use]
    pub fn new(settings: &EngineSettings, generator: Arc<dyn ContentGenerator>) -> Self {
        let decider = match settings.rng_seed {
            Some(seed) => DecisionEngine::seeded(
                settings.base_like_rate,
                settings.base_retweet_rate,
                settings.engage_threshold,
                seed,
            ),
            None => DecisionEngine::new(
                settings.base_like_rate,
                settings.base_retweet_rate,
                settings.engage_threshold,
            ),
        };

        Self {
            catalog: RwLock::new(PersonaCatalog::with_defaults()),
            decider,
            dedup: Box::new(MemoryDeduplicator::new()),
            history: Box::new(MemoryHistory::new()),
            generator,
            gateway: None,
            limiter: RateLimiter::new(settings.limiter_max_calls, settings.limiter_window),
            observer: Arc::new(NoopObserver),
            thread_length: settings.thread_length.max(1),
        }
    }

    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn SocialGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: PersonaCatalog) -> Self {
        self.catalog = RwLock::new(catalog);
        self
    }

    #[must_use]
    pub fn with_stores(
        mut self,
        dedup: Box<dyn Deduplicator>,
        history: Box<dyn HistoryStore>,
    ) -> Self {
        self.dedup = dedup;
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_decider(mut self, decider: DecisionEngine) -> Self {
        self.decider = decider;
        self
    }

    // ── Decision pass ────────────────────────────────────────────────

    /// One full pass for one inbound post: dedup, persona selection,
    /// scoring, gating, content generation and isolated delivery.
    ///
    /// Returns the intended actions whether or not their deliveries
    /// succeeded; the only way to observe a delivery failure is through the
    /// injected observer. Duplicate IDs, missing personas and sub-threshold
    /// scores all return an empty list.
    pub async fn process_post(
        &self,
        post: &Post,
        account_id: i64,
        persona_override: Option<&str>,
        post_enabled: bool,
    ) -> Vec<ActionRecord> {
        if !self.dedup.check_and_mark(&post.id) {
            self.observer.record_event(&ObserverEvent::DuplicateSkipped {
                post_id: post.id.clone(),
            });
            return Vec::new();
        }

        let persona = {
            let catalog = self.catalog.read().expect("persona catalog lock poisoned");
            match persona_override {
                Some(name) => catalog.get(name).cloned(),
                None => catalog.select_for_text(&post.text).cloned(),
            }
        };
        let Some(persona) = persona else {
            self.observer.record_event(&ObserverEvent::PersonaMissing {
                post_id: post.id.clone(),
            });
            return Vec::new();
        };

        let now = Utc::now();
        let decision = self.decider.decide(post, now);
        if !decision.should_engage {
            self.observer.record_event(&ObserverEvent::EngagementDeclined {
                post_id: post.id.clone(),
                score: decision.score,
            });
            return Vec::new();
        }

        let reply_content = match self.generator.generate_reply(post, &persona).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => self.reply_fallback(post, &persona, "empty reply"),
            Err(err) => self.reply_fallback(post, &persona, &err.to_string()),
        };

        let thread_segments = if decision.should_thread {
            self.thread_segments(post, &persona).await
        } else {
            Vec::new()
        };

        let mut records = Vec::with_capacity(3 + thread_segments.len());
        records.push(ActionRecord {
            post_id: post.id.clone(),
            account_id,
            content: reply_content.clone(),
            persona: persona.name.clone(),
            kind: ActionKind::Reply,
        });
        if decision.should_like {
            records.push(ActionRecord {
                post_id: post.id.clone(),
                account_id,
                content: String::new(),
                persona: persona.name.clone(),
                kind: ActionKind::Like,
            });
        }
        if decision.should_retweet {
            records.push(ActionRecord {
                post_id: post.id.clone(),
                account_id,
                content: String::new(),
                persona: persona.name.clone(),
                kind: ActionKind::Retweet,
            });
        }
        for segment in &thread_segments {
            records.push(ActionRecord {
                post_id: post.id.clone(),
                account_id,
                content: segment.clone(),
                persona: persona.name.clone(),
                kind: ActionKind::Reply,
            });
        }

        let attempts = self
            .dispatch(post, &decision, &reply_content, &thread_segments, post_enabled)
            .await;
        let delivered = attempts
            .iter()
            .filter(|attempt| attempt.outcome == AttemptOutcome::Delivered)
            .count();
        for attempt in &attempts {
            self.observer.record_event(&ObserverEvent::ActionAttempted {
                post_id: post.id.clone(),
                label: attempt.label.clone(),
                outcome: attempt.outcome.as_str().to_string(),
            });
        }

        self.history.record(&post.id, now);

        self.observer.record_event(&ObserverEvent::PostProcessed {
            post_id: post.id.clone(),
            persona: persona.name.clone(),
            score: decision.score,
            actions: records.len(),
        });
        self.observer
            .record_metric(&ObserverMetric::ProcessedTotal(self.dedup.len()));
        self.observer
            .record_metric(&ObserverMetric::RateRemaining(self.limiter.remaining()));
        self.observer
            .record_metric(&ObserverMetric::ActionsDelivered(delivered));

        records
    }

    // ── Content ──────────────────────────────────────────────────────

    fn reply_fallback(&self, post: &Post, persona: &Persona, reason: &str) -> String {
        tracing::warn!(
            post_id = %post.id,
            persona = %persona.name,
            reason,
            "reply generation failed, using fallback"
        );
        self.observer.record_event(&ObserverEvent::GenerationFallback {
            post_id: post.id.clone(),
            scope: "reply".into(),
        });
        format!(
            "Interesting point about \"{}\" - {} will have more insights soon!",
            excerpt(&post.text, 50),
            persona.name
        )
    }

    /// Thread segments, already labelled. Generation failure substitutes the
    /// static fallback batch; the primary reply and the like/retweet gates
    /// are unaffected either way.
    async fn thread_segments(&self, post: &Post, persona: &Persona) -> Vec<String> {
        let requested = self.thread_length;
        let segments = match self
            .generator
            .generate_thread(post, persona, requested)
            .await
        {
            Ok(segments) if !segments.is_empty() => segments,
            Ok(_) => self.thread_fallback(post, persona, requested, "empty thread"),
            Err(err) => self.thread_fallback(post, persona, requested, &err.to_string()),
        };

        segments
            .into_iter()
            .take(requested)
            .enumerate()
            .map(|(index, segment)| format!("[Thread {}/{requested}] {segment}", index + 1))
            .collect()
    }

    fn thread_fallback(
        &self,
        post: &Post,
        persona: &Persona,
        len: usize,
        reason: &str,
    ) -> Vec<String> {
        tracing::warn!(
            post_id = %post.id,
            persona = %persona.name,
            reason,
            "thread generation failed, using fallback"
        );
        self.observer.record_event(&ObserverEvent::GenerationFallback {
            post_id: post.id.clone(),
            scope: "thread".into(),
        });
        (1..=len)
            .map(|index| {
                format!(
                    "Thread part {index}/{len}: Building on \"{}\" - more insights coming!",
                    excerpt(&post.text, 30)
                )
            })
            .collect()
    }

    // ── Delivery ─────────────────────────────────────────────────────

    /// Ordered delivery attempts, one per intended outbound call, aggregated
    /// without short-circuiting. Reply, like and retweet run concurrently;
    /// thread segments post sequentially after them, all but the last — the
    /// final segment is generated but never auto-posted.
    async fn dispatch(
        &self,
        post: &Post,
        decision: &EngagementDecision,
        reply_content: &str,
        thread_segments: &[String],
        post_enabled: bool,
    ) -> Vec<ActionAttempt> {
        let gateway = if post_enabled {
            self.gateway.as_ref()
        } else {
            None
        };

        let (reply_outcome, like_outcome, retweet_outcome) = tokio::join!(
            self.deliver(gateway, &post.id, Delivery::Reply(reply_content)),
            async {
                if decision.should_like {
                    Some(self.deliver(gateway, &post.id, Delivery::Like).await)
                } else {
                    None
                }
            },
            async {
                if decision.should_retweet {
                    Some(self.deliver(gateway, &post.id, Delivery::Retweet).await)
                } else {
                    None
                }
            },
        );

        let mut attempts = vec![ActionAttempt {
            kind: ActionKind::Reply,
            label: "reply".into(),
            outcome: reply_outcome,
        }];
        if let Some(outcome) = like_outcome {
            attempts.push(ActionAttempt {
                kind: ActionKind::Like,
                label: "like".into(),
                outcome,
            });
        }
        if let Some(outcome) = retweet_outcome {
            attempts.push(ActionAttempt {
                kind: ActionKind::Retweet,
                label: "retweet".into(),
                outcome,
            });
        }

        let total = thread_segments.len();
        for (index, segment) in thread_segments.iter().enumerate() {
            let label = format!("thread {}/{total}", index + 1);
            let outcome = if index + 1 == total {
                AttemptOutcome::Skipped
            } else {
                self.deliver(gateway, &post.id, Delivery::Reply(segment))
                    .await
            };
            attempts.push(ActionAttempt {
                kind: ActionKind::Reply,
                label,
                outcome,
            });
        }

        attempts
    }

    async fn deliver(
        &self,
        gateway: Option<&Arc<dyn SocialGateway>>,
        post_id: &str,
        delivery: Delivery<'_>,
    ) -> AttemptOutcome {
        let Some(gateway) = gateway else {
            return AttemptOutcome::Skipped;
        };
        if !self.limiter.try_acquire() {
            return AttemptOutcome::RateLimited;
        }

        let result = match delivery {
            Delivery::Reply(text) => gateway.post_reply(post_id, text).await,
            Delivery::Like => gateway.like(post_id).await,
            Delivery::Retweet => gateway.retweet(post_id).await,
        };

        match result {
            Ok(()) => AttemptOutcome::Delivered,
            Err(err) => {
                tracing::warn!(post_id, error = %err, "outbound action failed");
                AttemptOutcome::Failed(err.to_string())
            }
        }
    }

    // ── Host surface ─────────────────────────────────────────────────

    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.dedup.len()
    }

    #[must_use]
    pub fn engagement_history(&self) -> HashMap<String, DateTime<Utc>> {
        self.history.snapshot()
    }

    /// Resets the processed-set and the engagement history together.
    pub fn clear(&self) {
        self.dedup.clear();
        self.history.clear();
    }

    #[must_use]
    pub fn rate_remaining(&self) -> usize {
        self.limiter.remaining()
    }

    #[must_use]
    pub fn rate_next_available(&self) -> Duration {
        self.limiter.next_available()
    }

    // ── Persona management ───────────────────────────────────────────

    pub fn add_persona(&self, persona: Persona) {
        self.catalog
            .write()
            .expect("persona catalog lock poisoned")
            .add(persona);
    }

    pub fn remove_persona(&self, name: &str) -> bool {
        self.catalog
            .write()
            .expect("persona catalog lock poisoned")
            .remove(name)
    }

    #[must_use]
    pub fn personas(&self) -> Vec<Persona> {
        self.catalog
            .read()
            .expect("persona catalog lock poisoned")
            .all()
            .into_iter()
            .cloned()
            .collect()
    }
}
