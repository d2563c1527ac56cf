use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window admission control shared by every outbound platform call.
///
/// Fixed capacity over a trailing window, not a token bucket: the window
/// boundary is recomputed lazily on every query by pruning timestamps older
/// than `window`. No background timer. Check-and-record happens under a
/// single lock so concurrent callers cannot over-admit.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Admit one call if fewer than `max_calls` were admitted within the
    /// trailing window. Records a timestamp on success, nothing on denial.
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    pub fn try_acquire_at(&self, now: Instant) -> bool {
        let mut timestamps = self.timestamps.lock().expect("rate limiter lock poisoned");
        Self::prune(&mut timestamps, now, self.window);

        if timestamps.len() >= self.max_calls {
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Calls still permitted in the current window.
    pub fn remaining(&self) -> usize {
        self.remaining_at(Instant::now())
    }

    pub fn remaining_at(&self, now: Instant) -> usize {
        let mut timestamps = self.timestamps.lock().expect("rate limiter lock poisoned");
        Self::prune(&mut timestamps, now, self.window);
        self.max_calls - timestamps.len()
    }

    /// Time until the oldest retained timestamp exits the window. Zero when
    /// the limiter has headroom or no history.
    pub fn next_available(&self) -> Duration {
        self.next_available_at(Instant::now())
    }

    pub fn next_available_at(&self, now: Instant) -> Duration {
        let mut timestamps = self.timestamps.lock().expect("rate limiter lock poisoned");
        Self::prune(&mut timestamps, now, self.window);

        if timestamps.len() < self.max_calls {
            return Duration::ZERO;
        }

        match timestamps.front() {
            Some(oldest) => self.window.saturating_sub(now.duration_since(*oldest)),
            None => Duration::ZERO,
        }
    }

    pub fn reset(&self) {
        self.timestamps
            .lock()
            .expect("rate limiter lock poisoned")
            .clear();
    }

    fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) < window {
                break;
            }
            timestamps.pop_front();
        }
    }
}
