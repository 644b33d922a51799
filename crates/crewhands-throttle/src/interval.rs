//! Minimum-interval limiter.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum delay between consecutive actions.
#[derive(Debug)]
pub struct IntervalLimiter {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl IntervalLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep for whatever remains of the interval since the previous call.
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                debug!("Delay rate limit: waiting {:?}", remaining);
                sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}
