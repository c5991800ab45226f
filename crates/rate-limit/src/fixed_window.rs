use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Counter state for a single key's current window.
struct WindowState {
    count: u64,
    reset_at: Instant,
}

/// A concurrent fixed-window counter rate limiter.
///
/// Each key gets an independent window. The `DashMap` entry lock serializes
/// concurrent checks for the same key, so the read-increment-store below is
/// race-free without any outer lock.
pub struct FixedWindowLimiter {
    windows: DashMap<String, WindowState>,
    max_requests: u64,
    window: Duration,
}

impl FixedWindowLimiter {
    /// Create a new fixed-window limiter.
    ///
    /// * `max_requests` - requests allowed per window
    /// * `window`       - window duration
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Check whether a request identified by `key` is allowed.
    pub fn allow(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Clock-injectable variant of [`allow`](Self::allow); tests advance
    /// `now` instead of sleeping through a real window.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| WindowState {
                count: 0,
                reset_at: now + self.window,
            });

        let state = entry.value_mut();

        // A window that has expired is replaced wholesale; the old count
        // does not carry over.
        if now >= state.reset_at {
            state.count = 0;
            state.reset_at = now + self.window;
        }

        if state.count < self.max_requests {
            state.count += 1;
            true
        } else {
            false
        }
    }

    /// Remove entries whose window expired more than one full window ago.
    ///
    /// Called periodically from the cleanup thread to keep one-off client
    /// keys from accumulating.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let stale_after = self.window;

        self.windows
            .retain(|_key, state| now < state.reset_at + stale_after);

        tracing::debug!(remaining = self.windows.len(), "fixed window cleanup complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_max() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_millis(60_000));
        let key = "198.51.100.7";

        for i in 0..5 {
            assert!(limiter.allow(key), "request {} should be allowed", i);
        }

        assert!(!limiter.allow(key), "should deny beyond max");
    }

    #[test]
    fn window_expiry_resets_count() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_millis(60_000));
        let key = "198.51.100.8";
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check_at(key, start));
        }
        assert!(!limiter.check_at(key, start));

        // Advance past the window boundary: the next request opens a fresh
        // window and counts 1 again.
        let later = start + Duration::from_millis(60_001);
        assert!(limiter.check_at(key, later));

        for _ in 0..4 {
            assert!(limiter.check_at(key, later));
        }
        assert!(!limiter.check_at(key, later));
    }

    #[test]
    fn denies_inside_open_window() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(60_000));
        let key = "198.51.100.9";
        let start = Instant::now();

        assert!(limiter.check_at(key, start));
        // Still inside the window: denied no matter how close to expiry.
        assert!(!limiter.check_at(key, start + Duration::from_millis(59_999)));
    }

    #[test]
    fn independent_keys() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_millis(60_000));

        assert!(limiter.allow("a"));
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));

        // Key B is independent.
        assert!(limiter.allow("b"));
    }

    #[test]
    fn cleanup_removes_expired_entries() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_millis(100));
        limiter.allow("keep-alive");
        limiter.allow("will-be-stale");

        // Manually age one entry past the retention horizon.
        {
            let mut entry = limiter.windows.get_mut("will-be-stale").unwrap();
            entry.reset_at = Instant::now() - Duration::from_secs(10);
        }

        limiter.cleanup();

        assert!(limiter.windows.contains_key("keep-alive"));
        assert!(!limiter.windows.contains_key("will-be-stale"));
    }
}
