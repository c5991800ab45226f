use std::sync::Arc;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use sitesentry_common::AppConfig;
use sitesentry_rate_limit::RateLimiter;
use sitesentry_storage::Store;
use sitesentry_tracking::Recorder;

use crate::mail::Mailer;

/// Shared state type alias used across all route handlers.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, the ingestion pipeline, the
/// contact-path limiter, the mail seam, and metrics.
pub struct AppState {
    pub config: AppConfig,
    pub recorder: Recorder,
    pub limiter: RateLimiter,
    pub mailer: Arc<dyn Mailer>,
    pub metrics: TrackerMetrics,
    pub start_time: std::time::Instant,
}

/// Prometheus counters collected by the tracker.
pub struct TrackerMetrics {
    pub registry: Registry,
    pub events_recorded: IntCounterVec,
    pub traps_triggered: IntCounter,
    pub rate_limited_total: IntCounter,
    pub contact_submissions: IntCounter,
}

impl TrackerMetrics {
    /// Create a new TrackerMetrics instance with all counters registered
    /// against a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let events_recorded = IntCounterVec::new(
            Opts::new(
                "sitesentry_events_recorded_total",
                "Telemetry events accepted, labelled by kind",
            ),
            &["kind"],
        )
        .expect("failed to create events_recorded counter");

        let traps_triggered = IntCounter::with_opts(Opts::new(
            "sitesentry_traps_triggered_total",
            "Honeypot traps triggered (reported hits plus decoy endpoint probes)",
        ))
        .expect("failed to create traps_triggered counter");

        let rate_limited_total = IntCounter::with_opts(Opts::new(
            "sitesentry_rate_limited_total",
            "Contact requests rejected by the rate limiter",
        ))
        .expect("failed to create rate_limited_total counter");

        let contact_submissions = IntCounter::with_opts(Opts::new(
            "sitesentry_contact_submissions_total",
            "Contact form submissions accepted",
        ))
        .expect("failed to create contact_submissions counter");

        registry
            .register(Box::new(events_recorded.clone()))
            .expect("failed to register events_recorded");
        registry
            .register(Box::new(traps_triggered.clone()))
            .expect("failed to register traps_triggered");
        registry
            .register(Box::new(rate_limited_total.clone()))
            .expect("failed to register rate_limited_total");
        registry
            .register(Box::new(contact_submissions.clone()))
            .expect("failed to register contact_submissions");

        Self {
            registry,
            events_recorded,
            traps_triggered,
            rate_limited_total,
            contact_submissions,
        }
    }
}

impl AppState {
    /// Assemble the application state from its parts.
    pub fn new(config: AppConfig, store: Store, mailer: Arc<dyn Mailer>) -> Self {
        let limiter = RateLimiter::new(&config.rate_limit);
        Self {
            config,
            recorder: Recorder::new(store),
            limiter,
            mailer,
            metrics: TrackerMetrics::new(),
            start_time: std::time::Instant::now(),
        }
    }
}
