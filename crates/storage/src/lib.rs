//! SQLite persistence for SiteSentry.
//!
//! Two families of writes live here:
//!
//! - **Event appends** -- unconditional inserts into the append-only log
//!   tables. The logs are the source of truth; nothing updates or deletes
//!   them.
//! - **Session-summary upserts** -- single-statement
//!   `INSERT .. ON CONFLICT(session_id) DO UPDATE` writes. Two events for
//!   the same token arriving at the same instant must not lose an
//!   increment, so the conditional-insert-or-update happens inside SQLite
//!   rather than as a read-then-write pair in application code.
//!
//! The summary is a materialized view over the event logs and can be
//! rebuilt by replaying them in `created_at` order.

pub mod records;
pub mod schema;
pub mod stats;

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use sitesentry_common::config::DatabaseConfig;
use sitesentry_common::{TelemetryError, TelemetryResult};

pub use records::{
    EventKind, NewClick, NewContactSubmission, NewHoneypotAlert, NewPageView, NewVisitorEvent,
    SessionSummary,
};
pub use stats::DashboardStats;

/// Handle to the SQLite store. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Open (creating if missing) the database file and apply the schema.
    pub async fn connect(config: &DatabaseConfig) -> TelemetryResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let options = SqliteConnectOptions::from_str("sqlite://")
            .map_err(TelemetryError::storage)?
            .filename(&config.path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(TelemetryError::storage)?;

        let store = Self { pool };
        store.init_schema().await?;
        tracing::info!(path = %config.path.display(), "sqlite store ready");
        Ok(store)
    }

    /// In-memory store for tests. A single connection keeps the database
    /// alive for the pool's lifetime.
    pub async fn connect_in_memory() -> TelemetryResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(TelemetryError::storage)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> TelemetryResult<()> {
        sqlx::raw_sql(schema::SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(TelemetryError::storage)?;
        Ok(())
    }

    /// The underlying pool, for ad-hoc read queries (tests, maintenance).
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Append a visitor-arrival event.
    pub async fn append_visitor_event(&self, event: &NewVisitorEvent) -> TelemetryResult<()> {
        sqlx::query(
            "INSERT INTO visitor_events (
                session_id, ip_address, user_agent, referrer, landing_page,
                country, city, region, latitude, longitude,
                device_type, browser, os, screen_resolution, language, timezone,
                is_bot, bot_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        )
        .bind(&event.session_id)
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .bind(&event.referrer)
        .bind(&event.landing_page)
        .bind(&event.country)
        .bind(&event.city)
        .bind(&event.region)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(&event.device_type)
        .bind(&event.browser)
        .bind(&event.os)
        .bind(&event.screen_resolution)
        .bind(&event.language)
        .bind(&event.timezone)
        .bind(event.is_bot)
        .bind(&event.bot_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(TelemetryError::storage)?;
        Ok(())
    }

    /// Append a page-view event.
    pub async fn append_page_view(&self, event: &NewPageView) -> TelemetryResult<()> {
        sqlx::query(
            "INSERT INTO page_view_events (
                session_id, page_url, page_title, time_on_page, scroll_depth, clicks_count, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&event.session_id)
        .bind(&event.page_url)
        .bind(&event.page_title)
        .bind(event.time_on_page)
        .bind(event.scroll_depth)
        .bind(event.clicks_count)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(TelemetryError::storage)?;
        Ok(())
    }

    /// Append a click event.
    pub async fn append_click(&self, event: &NewClick) -> TelemetryResult<()> {
        sqlx::query(
            "INSERT INTO click_events (
                session_id, element_type, element_id, element_class, element_text,
                page_url, x_position, y_position, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&event.session_id)
        .bind(&event.element_type)
        .bind(&event.element_id)
        .bind(&event.element_class)
        .bind(&event.element_text)
        .bind(&event.page_url)
        .bind(event.x_position)
        .bind(event.y_position)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(TelemetryError::storage)?;
        Ok(())
    }

    /// Append a honeypot alert.
    pub async fn append_honeypot_alert(&self, alert: &NewHoneypotAlert) -> TelemetryResult<()> {
        sqlx::query(
            "INSERT INTO honeypot_alerts (
                session_id, ip_address, user_agent, trap_type, trap_url,
                request_method, request_headers, request_body, threat_level, country, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&alert.session_id)
        .bind(&alert.ip_address)
        .bind(&alert.user_agent)
        .bind(&alert.trap_type)
        .bind(&alert.trap_url)
        .bind(&alert.request_method)
        .bind(&alert.request_headers)
        .bind(&alert.request_body)
        .bind(&alert.threat_level)
        .bind(&alert.country)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(TelemetryError::storage)?;
        Ok(())
    }

    /// Append an accepted contact submission.
    pub async fn append_contact_submission(
        &self,
        submission: &NewContactSubmission,
    ) -> TelemetryResult<()> {
        sqlx::query(
            "INSERT INTO contact_submissions (
                session_id, ip_address, name, email, message, user_agent, country, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&submission.session_id)
        .bind(&submission.ip_address)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.message)
        .bind(&submission.user_agent)
        .bind(&submission.country)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(TelemetryError::storage)?;
        Ok(())
    }

    /// Create-or-update the session summary for `token` in one atomic
    /// statement.
    ///
    /// The insert path seeds `total_pages = 1` (the creating event is the
    /// session's first page); the update path bumps `last_visit` and the
    /// counter matching the event kind. Any event kind may be the first to
    /// reference a token -- rows are created on demand.
    pub async fn upsert_session(
        &self,
        token: &str,
        ip: &str,
        kind: EventKind,
    ) -> TelemetryResult<()> {
        let sql = match kind {
            EventKind::PageView => {
                "INSERT INTO session_summary
                    (session_id, ip_address, total_pages, total_clicks,
                     triggered_honeypot, is_suspicious, first_visit, last_visit)
                 VALUES (?1, ?2, 1, 0, 0, 0, ?3, ?3)
                 ON CONFLICT(session_id) DO UPDATE SET
                    total_pages = total_pages + 1,
                    last_visit = excluded.last_visit"
            }
            EventKind::Click => {
                "INSERT INTO session_summary
                    (session_id, ip_address, total_pages, total_clicks,
                     triggered_honeypot, is_suspicious, first_visit, last_visit)
                 VALUES (?1, ?2, 1, 0, 0, 0, ?3, ?3)
                 ON CONFLICT(session_id) DO UPDATE SET
                    total_clicks = total_clicks + 1,
                    last_visit = excluded.last_visit"
            }
            EventKind::Arrival | EventKind::Honeypot => {
                "INSERT INTO session_summary
                    (session_id, ip_address, total_pages, total_clicks,
                     triggered_honeypot, is_suspicious, first_visit, last_visit)
                 VALUES (?1, ?2, 1, 0, 0, 0, ?3, ?3)
                 ON CONFLICT(session_id) DO UPDATE SET
                    last_visit = excluded.last_visit"
            }
        };

        sqlx::query(sql)
            .bind(token)
            .bind(ip)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(TelemetryError::storage)?;
        Ok(())
    }

    /// Mark the owning session of a honeypot trigger as suspicious.
    ///
    /// Separate from [`upsert_session`](Self::upsert_session): the flags are
    /// monotonic (set, never cleared) and must land even when no row exists
    /// yet, so the insert path seeds them already raised.
    pub async fn flag_session_suspicious(&self, token: &str, ip: &str) -> TelemetryResult<()> {
        sqlx::query(
            "INSERT INTO session_summary
                (session_id, ip_address, total_pages, total_clicks,
                 triggered_honeypot, is_suspicious, first_visit, last_visit)
             VALUES (?1, ?2, 1, 0, 1, 1, ?3, ?3)
             ON CONFLICT(session_id) DO UPDATE SET
                triggered_honeypot = 1,
                is_suspicious = 1,
                last_visit = excluded.last_visit",
        )
        .bind(token)
        .bind(ip)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(TelemetryError::storage)?;
        Ok(())
    }

    /// Fetch one session-summary row, if present.
    pub async fn get_session(&self, token: &str) -> TelemetryResult<Option<SessionSummary>> {
        sqlx::query_as::<_, SessionSummary>(
            "SELECT session_id, ip_address, total_pages, total_clicks,
                    triggered_honeypot, is_suspicious, first_visit, last_visit
             FROM session_summary WHERE session_id = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(TelemetryError::storage)
    }
}
