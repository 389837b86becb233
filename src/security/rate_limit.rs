//! Process-wide token bucket rate limiting.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Returned by [`RateLimiter::remove_tokens`] when the request cannot be served.
pub const REJECTED: f64 = -1.0;

/// A source of request tokens shared by every API request.
///
/// Implemented in-process by [`TokenBucket`]; a deployment running several
/// gate instances can plug in a limiter backed by shared storage instead.
pub trait RateLimiter: Send + Sync {
    /// Remove `count` tokens.
    ///
    /// Returns the tokens left after removal, or a negative value when the
    /// tokens are not available.
    fn remove_tokens(&self, count: u32) -> f64;
}

struct BucketState {
    content: f64,
    last_drip: Instant,
    interval_start: Instant,
    taken_this_interval: u32,
}

/// A token bucket that refills continuously toward `capacity`, combined
/// with a cap of `capacity` tokens per fixed interval window.
pub struct TokenBucket {
    capacity: u32,
    interval: Duration,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket granting `tokens_per_interval` tokens every `interval`.
    pub fn new(tokens_per_interval: u32, interval: Duration) -> Self {
        Self::starting_at(tokens_per_interval, interval, Instant::now())
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.tokens_per_interval,
            Duration::from_secs(config.interval_secs),
        )
    }

    fn starting_at(tokens_per_interval: u32, interval: Duration, now: Instant) -> Self {
        Self {
            capacity: tokens_per_interval,
            interval,
            state: Mutex::new(BucketState {
                content: tokens_per_interval as f64,
                last_drip: now,
                interval_start: now,
                taken_this_interval: 0,
            }),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Tokens currently in the bucket, without refilling.
    pub fn available(&self) -> f64 {
        self.state.lock().content
    }

    /// Remove `count` tokens as of `now`.
    pub fn remove_tokens_at(&self, count: u32, now: Instant) -> f64 {
        if count > self.capacity {
            return REJECTED;
        }

        let mut state = self.state.lock();

        if now.saturating_duration_since(state.interval_start) >= self.interval {
            state.interval_start = now;
            state.taken_this_interval = 0;
        }
        match state.taken_this_interval.checked_add(count) {
            Some(taken) if taken <= self.capacity => {}
            _ => return REJECTED,
        }

        // Refill
        let elapsed = now.saturating_duration_since(state.last_drip).as_secs_f64();
        let rate = self.capacity as f64 / self.interval.as_secs_f64();
        state.content = (state.content + elapsed * rate).min(self.capacity as f64);
        state.last_drip = now;

        if (count as f64) > state.content {
            return REJECTED;
        }

        state.content -= count as f64;
        state.taken_this_interval += count;
        state.content
    }
}

impl RateLimiter for TokenBucket {
    fn remove_tokens(&self, count: u32) -> f64 {
        self.remove_tokens_at(count, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(tokens: u32, secs: u64) -> (TokenBucket, Instant) {
        let start = Instant::now();
        (
            TokenBucket::starting_at(tokens, Duration::from_secs(secs), start),
            start,
        )
    }

    #[test]
    fn test_fifty_first_request_is_rejected() {
        let (limiter, start) = bucket(50, 60);

        for i in 0..50 {
            let remaining = limiter.remove_tokens_at(1, start + Duration::from_millis(i));
            assert!(remaining >= 0.0, "request {} rejected", i + 1);
        }
        let remaining = limiter.remove_tokens_at(1, start + Duration::from_millis(50));
        assert!(remaining < 0.0);
    }

    #[test]
    fn test_remaining_counts_down() {
        let (limiter, start) = bucket(3, 60);
        assert_eq!(limiter.remove_tokens_at(1, start), 2.0);
        assert_eq!(limiter.remove_tokens_at(1, start), 1.0);
        assert_eq!(limiter.remove_tokens_at(1, start), 0.0);
        assert_eq!(limiter.remove_tokens_at(1, start), REJECTED);
    }

    #[test]
    fn test_refills_after_interval() {
        let (limiter, start) = bucket(50, 60);
        for _ in 0..50 {
            limiter.remove_tokens_at(1, start);
        }
        assert!(limiter.remove_tokens_at(1, start + Duration::from_secs(30)) < 0.0);

        let later = start + Duration::from_secs(61);
        assert!(limiter.remove_tokens_at(1, later) >= 0.0);
    }

    #[test]
    fn test_partial_refill_within_next_window() {
        let (limiter, start) = bucket(10, 10);
        for _ in 0..10 {
            limiter.remove_tokens_at(1, start);
        }

        // New window after 10s; the bucket has dripped back to full by then.
        let t = start + Duration::from_secs(10);
        assert_eq!(limiter.remove_tokens_at(1, t), 9.0);

        // Window cap still applies even though tokens drip back in.
        for _ in 0..9 {
            limiter.remove_tokens_at(1, t);
        }
        assert!(limiter.remove_tokens_at(1, t + Duration::from_secs(5)) < 0.0);
    }

    #[test]
    fn test_huge_capacity_does_not_overflow_window_count() {
        let (limiter, start) = bucket(u32::MAX, 60);
        assert_eq!(limiter.remove_tokens_at(u32::MAX, start), 0.0);
        assert_eq!(limiter.remove_tokens_at(1, start), REJECTED);
        assert_eq!(limiter.remove_tokens_at(u32::MAX, start), REJECTED);
    }

    #[test]
    fn test_oversized_request_always_rejected() {
        let (limiter, start) = bucket(5, 1);
        assert_eq!(limiter.remove_tokens_at(6, start), REJECTED);
        assert_eq!(limiter.available(), 5.0);
    }

    #[test]
    fn test_rejection_does_not_consume() {
        let (limiter, start) = bucket(2, 60);
        limiter.remove_tokens_at(2, start);
        limiter.remove_tokens_at(1, start);
        limiter.remove_tokens_at(1, start);
        assert_eq!(limiter.available(), 0.0);
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let limiter = Arc::new(TokenBucket::new(100, Duration::from_secs(3600)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..50).filter(|_| limiter.remove_tokens(1) >= 0.0).count()
                })
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 100);
    }
}
