//! Token bucket rate limiter.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::ThrottleError;

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    pub requests_per_minute: u32,
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 10,
            burst_size: 3,
        }
    }
}

/// Snapshot of a limiter's state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimiterStatus {
    pub tokens: f64,
    pub waiting: usize,
    pub requests_per_minute: u32,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    fn refill(&mut self, rate_per_ms: f64, capacity: f64) {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.last_refill).as_secs_f64() * 1000.0;
        self.tokens = (self.tokens + elapsed_ms * rate_per_ms).min(capacity);
        self.last_refill = now;
    }
}

/// Decrements the waiter count even when an acquire is cancelled.
struct WaitGuard<'a>(&'a AtomicUsize);

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Token bucket with capacity `burst_size`, refilled continuously at
/// `requests_per_minute` and starting full.
///
/// Waiters are served in arrival order: the turn lock is a fair async mutex
/// and is held while the head waiter sleeps for its token.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    rate_per_ms: f64,
    turn: tokio::sync::Mutex<()>,
    bucket: Mutex<Bucket>,
    waiting: AtomicUsize,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Result<Self, ThrottleError> {
        if config.requests_per_minute == 0 {
            return Err(ThrottleError::InvalidConfig(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }
        if config.burst_size == 0 {
            return Err(ThrottleError::InvalidConfig(
                "burst_size must be greater than 0".to_string(),
            ));
        }

        Ok(Self::build(config))
    }

    /// Construct without validating; callers must have validated `config`.
    pub(crate) fn build(config: RateLimiterConfig) -> Self {
        Self {
            config,
            rate_per_ms: f64::from(config.requests_per_minute) / 60_000.0,
            turn: tokio::sync::Mutex::new(()),
            bucket: Mutex::new(Bucket {
                tokens: f64::from(config.burst_size),
                last_refill: Instant::now(),
            }),
            waiting: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> RateLimiterConfig {
        self.config
    }

    /// Suspend until a token is available, then take it.
    pub async fn acquire(&self) {
        self.waiting.fetch_add(1, Ordering::SeqCst);
        let _waiting = WaitGuard(&self.waiting);
        let _turn = self.turn.lock().await;

        loop {
            let wait = {
                let mut bucket = self.bucket.lock();
                bucket.refill(self.rate_per_ms, f64::from(self.config.burst_size));
                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    None
                } else {
                    let ms = ((1.0 - bucket.tokens) / self.rate_per_ms).ceil() as u64;
                    Some(Duration::from_millis(ms.max(1)))
                }
            };

            match wait {
                None => return,
                Some(delay) => {
                    debug!("Rate limit: waiting {:?} for next token", delay);
                    sleep(delay).await;
                }
            }
        }
    }

    /// Acquire a token, then run `operation`. Its error is returned as is.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.acquire().await;
        operation().await
    }

    pub fn status(&self) -> LimiterStatus {
        let mut bucket = self.bucket.lock();
        bucket.refill(self.rate_per_ms, f64::from(self.config.burst_size));
        LimiterStatus {
            tokens: bucket.tokens,
            waiting: self.waiting.load(Ordering::SeqCst),
            requests_per_minute: self.config.requests_per_minute,
        }
    }
}

#[cfg(test)]
#[path = "limiter_tests.rs"]
mod tests;
