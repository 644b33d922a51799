//! # CrewHands Throttle
//!
//! Pacing for slow, unreliable browser-driven I/O:
//!
//! - [`RateLimiter`] - FIFO token bucket
//! - [`IntervalLimiter`] - minimum delay between consecutive actions
//! - [`KeyedRateLimiter`] - one token bucket per key
//! - [`RetryPolicy`] - exponential backoff for transient failures
//! - [`ProxyRotator`] - round-robin egress routes with health probing

mod error;
mod interval;
mod keyed;
mod limiter;
mod proxy;
mod retry;

pub use error::ThrottleError;
pub use interval::IntervalLimiter;
pub use keyed::KeyedRateLimiter;
pub use limiter::{LimiterStatus, RateLimiter, RateLimiterConfig};
pub use proxy::{HealthStatus, ProxyHealth, ProxyRotator, ProxyRoute};
pub use retry::RetryPolicy;
