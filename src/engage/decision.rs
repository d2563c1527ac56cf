use super::scorer;
use crate::social::Post;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Mutex;

const FOLLOWER_WEIGHT_DIVISOR: f64 = 10_000.0;
const LIKE_FOLLOWER_CAP: f64 = 2.0;
const RETWEET_FOLLOWER_CAP: f64 = 1.5;
const VERIFIED_RETWEET_FACTOR: f64 = 2.0;

/// Default for the upstream engagement hint when a post arrives without one.
/// This is the *input* score — distinct from the value the scorer computes,
/// which drives the engage gate alone.
const DEFAULT_INPUT_SCORE: f64 = 50.0;

const THREAD_FOLLOWER_THRESHOLD: u64 = 5_000;
const THREAD_INPUT_SCORE_THRESHOLD: f64 = 50.0;
const THREAD_TEXT_CHARS: usize = 80;

/// Per-post gate outcomes. Each gate is computed independently; any subset
/// may fire together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementDecision {
    /// Computed desirability score (the scorer's output, not the upstream
    /// hint).
    pub score: u8,
    pub should_engage: bool,
    pub should_like: bool,
    pub should_retweet: bool,
    pub should_thread: bool,
}

impl EngagementDecision {
    fn declined(score: u8) -> Self {
        Self {
            score,
            should_engage: false,
            should_like: false,
            should_retweet: false,
            should_thread: false,
        }
    }
}

/// Probability weight for the like gate: base rate scaled by the upstream
/// engagement hint and a capped follower factor.
#[must_use]
pub fn like_weight(post: &Post, base_rate: f64) -> f64 {
    let input_score = post.engagement_score.unwrap_or(DEFAULT_INPUT_SCORE) / 100.0;
    let follower_factor =
        (post.author_follower_count as f64 / FOLLOWER_WEIGHT_DIVISOR).min(LIKE_FOLLOWER_CAP);
    base_rate * input_score * follower_factor
}

/// Probability weight for the retweet gate: base rate, doubled for verified
/// authors, scaled by a capped follower factor. Non-decreasing in follower
/// count up to the cap.
#[must_use]
pub fn retweet_weight(post: &Post, base_rate: f64) -> f64 {
    let verified_factor = if post.author_verified {
        VERIFIED_RETWEET_FACTOR
    } else {
        1.0
    };
    let follower_factor =
        (post.author_follower_count as f64 / FOLLOWER_WEIGHT_DIVISOR).min(RETWEET_FOLLOWER_CAP);
    base_rate * verified_factor * follower_factor
}

/// Deterministic thread gate. The score clause reads the upstream hint; an
/// absent hint leaves the clause false, it is not defaulted here.
#[must_use]
pub fn thread_gate(post: &Post) -> bool {
    post.author_follower_count > THREAD_FOLLOWER_THRESHOLD
        || post
            .engagement_score
            .is_some_and(|s| s > THREAD_INPUT_SCORE_THRESHOLD)
        || post.text.chars().count() > THREAD_TEXT_CHARS
}

/// Computes the per-post [`EngagementDecision`].
///
/// The random source is injected so gate outcomes are reproducible: seed it
/// for tests, leave it OS-seeded in production.
pub struct DecisionEngine {
    base_like_rate: f64,
    base_retweet_rate: f64,
    engage_threshold: u8,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl DecisionEngine {
    #[must_use]
    pub fn new(base_like_rate: f64, base_retweet_rate: f64, engage_threshold: u8) -> Self {
        Self::with_rng(
            base_like_rate,
            base_retweet_rate,
            engage_threshold,
            Box::new(StdRng::from_os_rng()),
        )
    }

    #[must_use]
    pub fn seeded(
        base_like_rate: f64,
        base_retweet_rate: f64,
        engage_threshold: u8,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            base_like_rate,
            base_retweet_rate,
            engage_threshold,
            Box::new(StdRng::seed_from_u64(seed)),
        )
    }

    #[must_use]
    pub fn with_rng(
        base_like_rate: f64,
        base_retweet_rate: f64,
        engage_threshold: u8,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            base_like_rate,
            base_retweet_rate,
            engage_threshold,
            rng: Mutex::new(rng),
        }
    }

    pub fn decide(&self, post: &Post, now: DateTime<Utc>) -> EngagementDecision {
        let score = scorer::score(post, now);
        if score <= self.engage_threshold {
            return EngagementDecision::declined(score);
        }

        let mut rng = self.rng.lock().expect("decision rng lock poisoned");
        let should_like = rng.random::<f64>() < like_weight(post, self.base_like_rate);
        let should_retweet = rng.random::<f64>() < retweet_weight(post, self.base_retweet_rate);

        EngagementDecision {
            score,
            should_engage: true,
            should_like,
            should_retweet,
            should_thread: thread_gate(post),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// Fixed-sequence random source for exact gate assertions.
    struct ConstRng(u64);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(8) {
                let bytes = self.0.to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    fn post(followers: u64, verified: bool) -> Post {
        Post {
            id: "p1".into(),
            author_handle: "someone".into(),
            text: "fresh alpha".into(),
            author_follower_count: followers,
            author_verified: verified,
            retweet_count: 0,
            favorite_count: 0,
            created_at: Utc::now(),
            engagement_score: None,
        }
    }

    #[test]
    fn like_weight_defaults_missing_input_score_to_50() {
        let p = post(10_000, false);
        let weight = like_weight(&p, 0.3);
        assert!((weight - 0.3 * 0.5 * 1.0).abs() < 1e-9);
    }

    #[test]
    fn like_weight_caps_follower_factor_at_two() {
        let p = post(100_000, false);
        let weight = like_weight(&p, 0.3);
        assert!((weight - 0.3 * 0.5 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn retweet_weight_is_monotonic_in_followers() {
        let mut previous = 0.0;
        for followers in [0, 1_000, 5_000, 10_000, 15_000, 20_000, 1_000_000] {
            let weight = retweet_weight(&post(followers, false), 0.1);
            assert!(weight >= previous, "weight decreased at {followers} followers");
            previous = weight;
        }
    }

    #[test]
    fn retweet_weight_caps_at_one_point_five() {
        let capped = retweet_weight(&post(15_000, false), 0.1);
        let beyond = retweet_weight(&post(10_000_000, false), 0.1);
        assert!((capped - beyond).abs() < 1e-9);
    }

    #[test]
    fn retweet_weight_doubles_for_verified() {
        let plain = retweet_weight(&post(10_000, false), 0.1);
        let verified = retweet_weight(&post(10_000, true), 0.1);
        assert!((verified - 2.0 * plain).abs() < 1e-9);
    }

    #[test]
    fn thread_gate_fires_on_follower_count() {
        assert!(thread_gate(&post(5_001, false)));
        assert!(!thread_gate(&post(5_000, false)));
    }

    #[test]
    fn thread_gate_fires_on_input_score() {
        let mut p = post(0, false);
        p.engagement_score = Some(51.0);
        assert!(thread_gate(&p));
        p.engagement_score = Some(50.0);
        assert!(!thread_gate(&p));
        // Absent hint leaves the clause false.
        p.engagement_score = None;
        assert!(!thread_gate(&p));
    }

    #[test]
    fn thread_gate_fires_on_long_text() {
        let mut p = post(0, false);
        p.text = "x".repeat(81);
        assert!(thread_gate(&p));
        p.text = "x".repeat(80);
        assert!(!thread_gate(&p));
    }

    #[test]
    fn low_score_declines_without_drawing_gates() {
        let engine = DecisionEngine::seeded(0.3, 0.1, 50, 7);
        let mut p = post(0, false);
        p.created_at = Utc::now() - chrono::Duration::hours(30);
        let decision = engine.decide(&p, Utc::now());
        assert!(!decision.should_engage);
        assert!(!decision.should_like);
        assert!(!decision.should_retweet);
        assert!(!decision.should_thread);
        assert_eq!(decision.score, 40);
    }

    #[test]
    fn zero_draw_fires_probabilistic_gates_with_positive_weight() {
        let engine = DecisionEngine::with_rng(0.3, 0.1, 50, Box::new(ConstRng(0)));
        let decision = engine.decide(&post(20_000, true), Utc::now());
        assert!(decision.should_engage);
        assert!(decision.should_like);
        assert!(decision.should_retweet);
    }

    #[test]
    fn max_draw_never_fires_probabilistic_gates() {
        // A draw of ~1.0 exceeds every achievable weight (caps put the like
        // gate at 0.6 and the retweet gate at 0.3).
        let engine = DecisionEngine::with_rng(0.3, 0.1, 50, Box::new(ConstRng(u64::MAX)));
        let decision = engine.decide(&post(20_000, true), Utc::now());
        assert!(decision.should_engage);
        assert!(!decision.should_like);
        assert!(!decision.should_retweet);
    }

    #[test]
    fn seeded_engines_agree() {
        let now = Utc::now();
        let p = post(20_000, true);
        let a = DecisionEngine::seeded(0.3, 0.1, 50, 42).decide(&p, now);
        let b = DecisionEngine::seeded(0.3, 0.1, 50, 42).decide(&p, now);
        assert_eq!(a, b);
    }

    #[test]
    fn gates_are_independent_any_subset_may_fire() {
        // Alternating low/high draws: like sees ~0, retweet sees ~1.
        struct AlternatingRng(bool);
        impl RngCore for AlternatingRng {
            fn next_u32(&mut self) -> u32 {
                self.next_u64() as u32
            }
            fn next_u64(&mut self) -> u64 {
                self.0 = !self.0;
                if self.0 { 0 } else { u64::MAX }
            }
            fn fill_bytes(&mut self, dst: &mut [u8]) {
                dst.fill(0);
            }
        }

        let engine =
            DecisionEngine::with_rng(0.3, 0.1, 50, Box::new(AlternatingRng(false)));
        let decision = engine.decide(&post(20_000, true), Utc::now());
        assert!(decision.should_like);
        assert!(!decision.should_retweet);
    }
}
