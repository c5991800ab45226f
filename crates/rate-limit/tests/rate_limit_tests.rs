use sitesentry_common::config::RateLimitConfig;
use sitesentry_rate_limit::RateLimiter;

fn config(max_requests: u64, window_ms: u64) -> RateLimitConfig {
    RateLimitConfig {
        window_ms,
        max_requests,
    }
}

#[test]
fn test_fixed_window_basic() {
    let limiter = RateLimiter::new(&config(5, 60_000));

    // Should allow 5 requests in the window
    for _ in 0..5 {
        assert!(limiter.allow("test-client"));
    }

    // 6th request should be denied
    assert!(!limiter.allow("test-client"));
}

#[test]
fn test_fixed_window_different_keys() {
    let limiter = RateLimiter::new(&config(2, 60_000));

    assert!(limiter.allow("client-a"));
    assert!(limiter.allow("client-a"));
    assert!(!limiter.allow("client-a"));

    // Different client should have its own window
    assert!(limiter.allow("client-b"));
    assert!(limiter.allow("client-b"));
    assert!(!limiter.allow("client-b"));
}

#[test]
fn test_window_expiry_reopens() {
    use sitesentry_rate_limit::FixedWindowLimiter;
    use std::time::{Duration, Instant};

    let limiter = FixedWindowLimiter::new(3, Duration::from_millis(60_000));
    let start = Instant::now();

    for _ in 0..3 {
        assert!(limiter.check_at("client", start));
    }
    assert!(!limiter.check_at("client", start));

    // Past the boundary the count starts over at 1.
    let later = start + Duration::from_millis(60_001);
    assert!(limiter.check_at("client", later));
}

#[test]
fn test_shared_unknown_bucket() {
    let limiter = RateLimiter::new(&config(3, 60_000));

    // Clients without a resolvable IP all share the "unknown" key.
    assert!(limiter.allow("unknown"));
    assert!(limiter.allow("unknown"));
    assert!(limiter.allow("unknown"));
    assert!(!limiter.allow("unknown"));
}
