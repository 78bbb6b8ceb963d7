//! Token-bucket rate limiter.
//!
//! The bucket is plain data: callers keep it behind a mutex and decide what a
//! rejected acquisition means. Time is passed in explicitly by the `*_at`
//! variants so refill behaviour is testable without sleeping.

use std::time::{Duration, Instant};

/// A token bucket holding at most `capacity` tokens, refilled continuously at
/// one token per `refill_interval`.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_interval: Duration,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or `refill_interval` is zero.
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self::new_at(capacity, refill_interval, Instant::now())
    }

    /// Create a full bucket whose refill clock starts at `now`.
    pub fn new_at(capacity: u32, refill_interval: Duration, now: Instant) -> Self {
        assert!(capacity > 0, "token bucket capacity must be positive");
        assert!(
            !refill_interval.is_zero(),
            "token bucket refill interval must be positive"
        );
        Self {
            capacity: f64::from(capacity),
            tokens: f64::from(capacity),
            refill_interval,
            last_refill: now,
        }
    }

    /// Take one token if available.
    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Take one token if available, refilling up to `now` first.
    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Whole tokens currently available as of `now`.
    pub fn available_at(&mut self, now: Instant) -> u32 {
        self.refill(now);
        // tokens is clamped to [0, capacity] and capacity came from a u32.
        self.tokens.floor() as u32
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let earned = elapsed.as_secs_f64() / self.refill_interval.as_secs_f64();
        self.tokens = (self.tokens + earned).min(self.capacity);
        self.last_refill = now;
    }
}
