//! Token-bucket pacing for upstream generation calls.
//!
//! The provider rate-limits aggressively, so consecutive generation calls in
//! a batch must be spaced out. Rather than sprinkling fixed sleeps through
//! the orchestrator, pacing lives behind this limiter: a token bucket
//! parameterized by requests-per-second, refilled continuously, with a burst
//! capacity of one bucket.
//!
//! This is a throttle, not a correctness mechanism; credit accounting does
//! not depend on it.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Async token-bucket rate limiter.
pub struct RateLimiter {
    rate_per_sec: f64,
    capacity: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// A limiter allowing `rate_per_sec` sustained calls with a burst of
    /// `burst` immediate ones. Rates at or below zero fall back to 1/s.
    pub fn new(rate_per_sec: f64, burst: u32) -> Self {
        let rate_per_sec = if rate_per_sec > 0.0 { rate_per_sec } else { 1.0 };
        let capacity = burst.max(1) as f64;
        Self {
            rate_per_sec,
            capacity,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Wait until a call is allowed, then take one token.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;

                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.capacity);
                bucket.last_refill = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }

                // Lock released before sleeping
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.rate_per_sec)
            };

            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_then_paced() {
        let limiter = RateLimiter::new(1.0, 1);

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        // Second call must wait roughly one second
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(990));
        assert!(start.elapsed() < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn burst_capacity_is_honored() {
        let limiter = RateLimiter::new(1.0, 3);

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(990));
    }

    #[tokio::test(start_paused = true)]
    async fn higher_rate_means_shorter_waits() {
        let limiter = RateLimiter::new(10.0, 1);

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(90));
        assert!(start.elapsed() < Duration::from_millis(200));
    }
}
