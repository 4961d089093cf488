//! Sliding-window rate limiter
//!
//! Bounds how often a single user can run commands. Uses a sliding window
//! over request timestamps with DashMap for thread-safe concurrent access,
//! so the gateway task never serializes on a global lock just to count
//! requests.

use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Clone)]
pub struct RateLimiter {
    requests: DashMap<u64, Vec<Instant>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: DashMap::new(),
            max_requests,
            time_window,
        }
    }

    /// Record a request for `user_id` if it fits in the window.
    ///
    /// Returns false when the user is over the limit; the request is not
    /// counted in that case.
    pub fn check(&self, user_id: u64) -> bool {
        let now = Instant::now();
        let mut entry = self.requests.entry(user_id).or_default();

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            false
        } else {
            entry.push(now);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[test]
    fn test_allows_under_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1));

        assert!(limiter.check(1));
        assert!(limiter.check(1));
        assert!(limiter.check(1));
    }

    #[test]
    fn test_blocks_over_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));

        assert!(limiter.check(1));
        assert!(limiter.check(1));
        assert!(!limiter.check(1));
    }

    #[tokio::test]
    async fn test_resets_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));

        assert!(limiter.check(1));
        assert!(!limiter.check(1));

        sleep(Duration::from_millis(150)).await;
        assert!(limiter.check(1));
    }

    #[test]
    fn test_limits_are_per_user() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));

        assert!(limiter.check(1));
        assert!(limiter.check(2));
        assert!(!limiter.check(1));
        assert!(!limiter.check(2));
    }
}
