//! Shared test doubles for the integration suite.
#![allow(dead_code)]

use async_trait::async_trait;
use kolpilot::content::ContentGenerator;
use kolpilot::observability::{Observer, ObserverEvent, ObserverMetric};
use kolpilot::persona::Persona;
use kolpilot::social::{Post, SocialGateway};
use chrono::Utc;
use rand::RngCore;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Posts ────────────────────────────────────────────────────────────

/// Fresh post from a verified author: well above the engage gate, under
/// every thread trigger.
pub fn engaging_post(id: &str, text: &str) -> Post {
    Post {
        id: id.into(),
        author_handle: "whale_watcher".into(),
        text: text.into(),
        author_follower_count: 0,
        author_verified: true,
        retweet_count: 0,
        favorite_count: 0,
        created_at: Utc::now(),
        engagement_score: None,
    }
}

/// Same, but with enough followers to trip the thread gate (and the follower
/// score bonus).
pub fn thread_worthy_post(id: &str, text: &str) -> Post {
    Post {
        author_follower_count: 20_000,
        ..engaging_post(id, text)
    }
}

/// Enough followers to give the like/retweet gates positive weight, not
/// enough to trip the thread gate.
pub fn gated_post(id: &str, text: &str) -> Post {
    Post {
        author_follower_count: 4_000,
        ..engaging_post(id, text)
    }
}

/// Stale post from an unremarkable author: scores 40, below the engage gate.
pub fn boring_post(id: &str) -> Post {
    Post {
        id: id.into(),
        author_handle: "lurker".into(),
        text: "nothing to see".into(),
        author_follower_count: 10,
        author_verified: false,
        retweet_count: 0,
        favorite_count: 0,
        created_at: Utc::now() - chrono::Duration::hours(30),
        engagement_score: None,
    }
}

// ── RNG doubles ──────────────────────────────────────────────────────

/// Draws ~0.0 forever: every probabilistic gate with positive weight fires.
pub struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

/// Draws ~1.0 forever: no probabilistic gate ever fires.
pub struct MaxRng;

impl RngCore for MaxRng {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }

    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0xFF);
    }
}

// ── Gateway double ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockGateway {
    pub replies: Mutex<Vec<(String, String)>>,
    pub likes: Mutex<Vec<String>>,
    pub retweets: Mutex<Vec<String>>,
    pub fail_replies: AtomicBool,
    pub fail_likes: AtomicBool,
    pub fail_retweets: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_replies(self) -> Self {
        self.fail_replies.store(true, Ordering::Relaxed);
        self
    }

    pub fn fail_likes(self) -> Self {
        self.fail_likes.store(true, Ordering::Relaxed);
        self
    }

    pub fn reply_texts(&self) -> Vec<String> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn reply_count(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    pub fn like_count(&self) -> usize {
        self.likes.lock().unwrap().len()
    }

    pub fn retweet_count(&self) -> usize {
        self.retweets.lock().unwrap().len()
    }
}

#[async_trait]
impl SocialGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn listen(&self, _tx: tokio::sync::mpsc::Sender<Post>) -> anyhow::Result<()> {
        Ok(())
    }

    async fn post_reply(&self, post_id: &str, text: &str) -> anyhow::Result<()> {
        if self.fail_replies.load(Ordering::Relaxed) {
            anyhow::bail!("reply rejected by platform");
        }
        self.replies
            .lock()
            .unwrap()
            .push((post_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn like(&self, post_id: &str) -> anyhow::Result<()> {
        if self.fail_likes.load(Ordering::Relaxed) {
            anyhow::bail!("like rejected by platform");
        }
        self.likes.lock().unwrap().push(post_id.to_string());
        Ok(())
    }

    async fn retweet(&self, post_id: &str) -> anyhow::Result<()> {
        if self.fail_retweets.load(Ordering::Relaxed) {
            anyhow::bail!("retweet rejected by platform");
        }
        self.retweets.lock().unwrap().push(post_id.to_string());
        Ok(())
    }
}

// ── Generator double ─────────────────────────────────────────────────

pub struct MockGenerator {
    reply: anyhow::Result<String>,
    thread: anyhow::Result<Vec<String>>,
}

impl MockGenerator {
    pub fn ok() -> Self {
        Self {
            reply: Ok("a thoughtful generated reply".into()),
            thread: Ok(vec![
                "first segment".into(),
                "second segment".into(),
                "third segment".into(),
            ]),
        }
    }

    pub fn failing_reply() -> Self {
        Self {
            reply: Err(anyhow::anyhow!("generation service unavailable")),
            ..Self::ok()
        }
    }

    pub fn failing_thread() -> Self {
        Self {
            thread: Err(anyhow::anyhow!("generation service unavailable")),
            ..Self::ok()
        }
    }
}

fn clone_result<T: Clone>(result: &anyhow::Result<T>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value.clone()),
        Err(err) => Err(anyhow::anyhow!("{err}")),
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_reply(&self, _post: &Post, _persona: &Persona) -> anyhow::Result<String> {
        clone_result(&self.reply)
    }

    async fn generate_thread(
        &self,
        _post: &Post,
        _persona: &Persona,
        len: usize,
    ) -> anyhow::Result<Vec<String>> {
        clone_result(&self.thread).map(|segments| segments.into_iter().take(len).collect())
    }
}

// ── Observer double ──────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn attempt_outcomes(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ObserverEvent::ActionAttempted { label, outcome, .. } => Some((label, outcome)),
                _ => None,
            })
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn record_event(&self, event: &ObserverEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn record_metric(&self, _metric: &ObserverMetric) {}

    fn name(&self) -> &str {
        "recording"
    }
}
