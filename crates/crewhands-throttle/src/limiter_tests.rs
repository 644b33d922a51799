use super::*;

use std::sync::Arc;

fn limiter(rpm: u32, burst: u32) -> RateLimiter {
    RateLimiter::new(RateLimiterConfig {
        requests_per_minute: rpm,
        burst_size: burst,
    })
    .unwrap()
}

#[test]
fn test_rejects_zero_rate() {
    let err = RateLimiter::new(RateLimiterConfig {
        requests_per_minute: 0,
        burst_size: 1,
    })
    .unwrap_err();
    assert!(err.to_string().contains("requests_per_minute"));

    assert!(RateLimiter::new(RateLimiterConfig {
        requests_per_minute: 10,
        burst_size: 0,
    })
    .is_err());
}

#[tokio::test(start_paused = true)]
async fn test_starts_full() {
    let limiter = limiter(10, 3);
    let start = Instant::now();
    for _ in 0..3 {
        limiter.acquire().await;
    }
    assert!(start.elapsed() < Duration::from_millis(10));
    assert!(limiter.status().tokens < 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_second_acquire_waits_for_refill() {
    let limiter = limiter(60, 1);
    let start = Instant::now();
    limiter.acquire().await;
    let first = start.elapsed();
    limiter.acquire().await;
    let second = start.elapsed();
    assert!(second - first >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_refill_capped_at_burst() {
    let limiter = limiter(60, 2);
    limiter.acquire().await;
    limiter.acquire().await;
    sleep(Duration::from_secs(30)).await;
    let status = limiter.status();
    assert!((status.tokens - 2.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_waiters_served_in_order() {
    let limiter = Arc::new(limiter(60, 1));
    let order = Arc::new(Mutex::new(Vec::new()));
    limiter.acquire().await;

    let mut handles = Vec::new();
    for i in 0..3 {
        let limiter = limiter.clone();
        let order = order.clone();
        handles.push(tokio::spawn(async move {
            limiter.acquire().await;
            order.lock().push(i);
        }));
        // Let each task enqueue before spawning the next.
        tokio::task::yield_now().await;
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(*order.lock(), vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_status_counts_waiters() {
    let limiter = Arc::new(limiter(60, 1));
    limiter.acquire().await;

    let background = limiter.clone();
    let handle = tokio::spawn(async move { background.acquire().await });
    tokio::task::yield_now().await;
    assert_eq!(limiter.status().waiting, 1);

    handle.await.unwrap();
    assert_eq!(limiter.status().waiting, 0);
    assert_eq!(limiter.status().requests_per_minute, 60);
}

#[tokio::test(start_paused = true)]
async fn test_execute_propagates_error() {
    let limiter = limiter(60, 2);
    let ok: Result<u32, String> = limiter.execute(|| async { Ok(7) }).await;
    assert_eq!(ok.unwrap(), 7);

    let err: Result<u32, String> = limiter
        .execute(|| async { Err("navigation failed".to_string()) })
        .await;
    assert_eq!(err.unwrap_err(), "navigation failed");
    assert!(limiter.status().tokens < 1.0);
}
