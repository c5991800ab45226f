//! Rate limiting for the contact-intake path.
//!
//! A fixed-window counter keyed by client IP: the first request for a key
//! opens a window expiring `window_ms` later and counts 1; requests inside
//! the open window increment the counter and are allowed until the
//! configured maximum is reached; once the window expires, the next request
//! opens a fresh window.
//!
//! Window boundaries are fixed per key, so a client can burst up to
//! `2 * max_requests` across a boundary. That approximation is intentional:
//! the limiter deters abuse of an outbound-mail path, it does not meter
//! billing. State lives in a [`DashMap`](dashmap::DashMap) in process
//! memory and is not shared across server instances.

pub mod fixed_window;

use std::sync::Arc;
use std::time::Duration;

pub use fixed_window::FixedWindowLimiter;

use sitesentry_common::config::RateLimitConfig;

/// Shared handle to the limiter.
///
/// Cheaply cloneable (backed by `Arc`) and safe to share across tasks and
/// threads; clones observe the same counters.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<FixedWindowLimiter>,
}

impl RateLimiter {
    /// Create a limiter from the configured window and per-window maximum.
    pub fn new(config: &RateLimitConfig) -> Self {
        tracing::info!(
            window_ms = config.window_ms,
            max_requests = config.max_requests,
            "creating fixed window rate limiter"
        );
        Self {
            inner: Arc::new(FixedWindowLimiter::new(
                config.max_requests,
                Duration::from_millis(config.window_ms),
            )),
        }
    }

    /// Check whether a request identified by `key` is allowed.
    ///
    /// Returns `true` if the request is permitted, `false` if the caller has
    /// exceeded the per-window maximum and should receive a 429 response.
    pub fn allow(&self, key: &str) -> bool {
        self.inner.allow(key)
    }

    /// Spawn a background thread that periodically evicts expired windows.
    ///
    /// Runs every 60 seconds for the lifetime of the process; one-off client
    /// keys would otherwise accumulate forever.
    pub fn start_cleanup_task(&self) {
        let inner = Arc::clone(&self.inner);

        std::thread::Builder::new()
            .name("rate-limit-cleanup".into())
            .spawn(move || loop {
                std::thread::sleep(Duration::from_secs(60));
                inner.cleanup();
                tracing::trace!("rate limiter cleanup tick completed");
            })
            .expect("failed to spawn rate-limit cleanup thread");
    }
}
