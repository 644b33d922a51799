//! Per-key rate limiting.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::ThrottleError;
use crate::limiter::{RateLimiter, RateLimiterConfig};

/// Lazily creates one [`RateLimiter`] per key from a shared default config.
#[derive(Debug)]
pub struct KeyedRateLimiter {
    config: RateLimiterConfig,
    limiters: DashMap<String, Arc<RateLimiter>>,
}

impl KeyedRateLimiter {
    pub fn new(config: RateLimiterConfig) -> Result<Self, ThrottleError> {
        RateLimiter::new(config)?;
        Ok(Self {
            config,
            limiters: DashMap::new(),
        })
    }

    /// Limiter for `key`, created on first use.
    pub fn limiter(&self, key: &str) -> Arc<RateLimiter> {
        if let Some(existing) = self.limiters.get(key) {
            return existing.clone();
        }
        self.limiters
            .entry(key.to_string())
            .or_insert_with(|| {
                debug!("Creating rate limiter for {}", key);
                Arc::new(RateLimiter::build(self.config))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}
