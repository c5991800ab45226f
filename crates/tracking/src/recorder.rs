use sitesentry_common::TelemetryResult;
use sitesentry_storage::{
    EventKind, NewClick, NewHoneypotAlert, NewPageView, NewVisitorEvent, Store,
};

use crate::events::{
    truncate_element_text, ClickPayload, ClientContext, HoneypotPayload, PageViewPayload,
    VisitorPayload,
};
use crate::threat::{classify, ThreatLevel};

/// The ingestion pipeline. One operation per event kind, each of which:
///
/// 1. validates the payload (nothing is written on a violation),
/// 2. appends the event to its durable log,
/// 3. upserts the session summary best-effort -- the append is never rolled
///    back when the upsert fails, since the logs are the source of truth
///    and the summary can be rebuilt by replay,
/// 4. for honeypot events, classifies the trap and raises the session's
///    suspicious flags.
#[derive(Clone)]
pub struct Recorder {
    store: Store,
}

impl Recorder {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Record a visitor-arrival event.
    pub async fn record_visitor(
        &self,
        payload: &VisitorPayload,
        ctx: &ClientContext,
    ) -> TelemetryResult<()> {
        payload.validate()?;

        // Prefer the Referer header; fall back to what the client script
        // observed, then to "direct".
        let referrer = ctx
            .referrer
            .clone()
            .or_else(|| payload.referrer.clone())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "direct".to_string());

        let event = NewVisitorEvent {
            session_id: payload.session_id.clone(),
            ip_address: ctx.ip.clone(),
            user_agent: ctx.user_agent.clone(),
            referrer,
            landing_page: payload.landing_page.clone(),
            country: ctx.country.clone(),
            city: ctx.city.clone(),
            region: ctx.region.clone(),
            latitude: ctx.latitude,
            longitude: ctx.longitude,
            device_type: payload.device_type.clone(),
            browser: payload.browser.clone(),
            os: payload.os.clone(),
            screen_resolution: payload.screen_resolution.clone(),
            language: payload.language.clone(),
            timezone: payload.timezone.clone(),
            is_bot: payload.is_bot,
            bot_name: payload.bot_name.clone(),
        };
        self.store.append_visitor_event(&event).await?;

        self.upsert_best_effort(&payload.session_id, &ctx.ip, EventKind::Arrival)
            .await;
        Ok(())
    }

    /// Record a page-view event.
    pub async fn record_page_view(
        &self,
        payload: &PageViewPayload,
        ctx: &ClientContext,
    ) -> TelemetryResult<()> {
        payload.validate()?;

        let event = NewPageView {
            session_id: payload.session_id.clone(),
            page_url: payload.page_url.clone(),
            page_title: payload.page_title.clone(),
            time_on_page: payload.time_on_page,
            scroll_depth: payload.scroll_depth,
            clicks_count: payload.clicks_count,
        };
        self.store.append_page_view(&event).await?;

        self.upsert_best_effort(&payload.session_id, &ctx.ip, EventKind::PageView)
            .await;
        Ok(())
    }

    /// Record a click event.
    pub async fn record_click(
        &self,
        payload: &ClickPayload,
        ctx: &ClientContext,
    ) -> TelemetryResult<()> {
        payload.validate()?;

        let event = NewClick {
            session_id: payload.session_id.clone(),
            element_type: payload.element_type.clone(),
            element_id: payload.element_id.clone(),
            element_class: payload.element_class.clone(),
            element_text: payload.element_text.as_deref().map(truncate_element_text),
            page_url: payload.page_url.clone(),
            x_position: payload.x,
            y_position: payload.y,
        };
        self.store.append_click(&event).await?;

        self.upsert_best_effort(&payload.session_id, &ctx.ip, EventKind::Click)
            .await;
        Ok(())
    }

    /// Record a honeypot trigger: classify, log the alert, flag the session.
    ///
    /// The threat level and country are derived here and never taken from
    /// the payload. Returns the assigned level.
    pub async fn record_honeypot(
        &self,
        payload: &HoneypotPayload,
        ctx: &ClientContext,
    ) -> TelemetryResult<ThreatLevel> {
        payload.validate()?;

        let level = classify(&payload.trap_type);
        let request_headers = match &payload.headers {
            Some(value) => value.to_string(),
            None => "{}".to_string(),
        };

        let alert = NewHoneypotAlert {
            session_id: payload.session_id.clone(),
            ip_address: ctx.ip.clone(),
            user_agent: ctx.user_agent.clone(),
            trap_type: payload.trap_type.clone(),
            trap_url: payload.trap_url.clone(),
            request_method: payload.method.clone().unwrap_or_else(|| "GET".to_string()),
            request_headers,
            request_body: payload.body.clone(),
            threat_level: level.as_str().to_string(),
            country: ctx.country.clone(),
        };
        self.store.append_honeypot_alert(&alert).await?;

        tracing::warn!(
            client_ip = %ctx.ip,
            session_id = %payload.session_id,
            trap_type = %payload.trap_type,
            trap_url = %payload.trap_url,
            threat_level = %level,
            "honeypot trap triggered"
        );

        self.upsert_best_effort(&payload.session_id, &ctx.ip, EventKind::Honeypot)
            .await;

        // Monotonic flag-set, created on demand if this trap hit is the
        // first the token has been seen.
        if let Err(err) = self
            .store
            .flag_session_suspicious(&payload.session_id, &ctx.ip)
            .await
        {
            tracing::warn!(
                session_id = %payload.session_id,
                error = %err,
                "failed to flag session as suspicious; alert log remains authoritative"
            );
        }

        Ok(level)
    }

    async fn upsert_best_effort(&self, token: &str, ip: &str, kind: EventKind) {
        if let Err(err) = self.store.upsert_session(token, ip, kind).await {
            tracing::warn!(
                session_id = %token,
                error = %err,
                "session summary upsert failed; event log remains authoritative"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn recorder() -> Recorder {
        Recorder::new(Store::connect_in_memory().await.unwrap())
    }

    fn ctx(ip: &str) -> ClientContext {
        ClientContext {
            ip: ip.to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            referrer: None,
            country: "DE".to_string(),
            city: "Berlin".to_string(),
            region: "BE".to_string(),
            latitude: Some(52.52),
            longitude: Some(13.405),
        }
    }

    fn visitor(session_id: &str) -> VisitorPayload {
        VisitorPayload {
            session_id: session_id.to_string(),
            landing_page: "https://example.com/".to_string(),
            referrer: Some("https://search.example/".to_string()),
            device_type: "desktop".to_string(),
            browser: "Firefox".to_string(),
            os: "Linux".to_string(),
            screen_resolution: "1920x1080".to_string(),
            language: "en-US".to_string(),
            timezone: "Europe/Berlin".to_string(),
            is_bot: false,
            bot_name: None,
        }
    }

    fn page_view(session_id: &str) -> PageViewPayload {
        PageViewPayload {
            session_id: session_id.to_string(),
            page_url: "https://example.com/pricing".to_string(),
            page_title: "Pricing".to_string(),
            time_on_page: 30,
            scroll_depth: 75,
            clicks_count: 2,
        }
    }

    fn honeypot(session_id: &str, trap_type: &str) -> HoneypotPayload {
        HoneypotPayload {
            session_id: session_id.to_string(),
            trap_type: trap_type.to_string(),
            trap_url: "/admin-login".to_string(),
            method: Some("POST".to_string()),
            headers: None,
            body: None,
        }
    }

    #[tokio::test]
    async fn arrival_creates_the_session() {
        let recorder = recorder().await;
        let token = Uuid::new_v4().to_string();

        recorder.record_visitor(&visitor(&token), &ctx("203.0.113.20")).await.unwrap();

        let row = recorder.store().get_session(&token).await.unwrap().unwrap();
        assert_eq!(row.total_pages, 1);
        assert_eq!(row.ip_address, "203.0.113.20");
        assert!(!row.is_suspicious);
    }

    #[tokio::test]
    async fn page_views_accumulate_after_arrival() {
        let recorder = recorder().await;
        let token = Uuid::new_v4().to_string();
        let ctx = ctx("203.0.113.21");

        recorder.record_visitor(&visitor(&token), &ctx).await.unwrap();
        for _ in 0..3 {
            recorder.record_page_view(&page_view(&token), &ctx).await.unwrap();
        }

        let row = recorder.store().get_session(&token).await.unwrap().unwrap();
        assert_eq!(row.total_pages, 4);
    }

    #[tokio::test]
    async fn click_before_arrival_creates_the_session() {
        // Any event kind may be the first to reference a token.
        let recorder = recorder().await;
        let token = Uuid::new_v4().to_string();

        let click = ClickPayload {
            session_id: token.clone(),
            element_type: "BUTTON".to_string(),
            element_id: Some("cta".to_string()),
            element_class: None,
            element_text: Some("Get started".to_string()),
            page_url: "https://example.com/".to_string(),
            x: 100,
            y: 200,
        };
        recorder.record_click(&click, &ctx("203.0.113.22")).await.unwrap();

        let row = recorder.store().get_session(&token).await.unwrap().unwrap();
        assert_eq!(row.total_pages, 1);
        assert_eq!(row.total_clicks, 0, "the creating click seeds the row, it is not an increment");
    }

    #[tokio::test]
    async fn invalid_payload_writes_nothing() {
        let recorder = recorder().await;
        let result = recorder
            .record_page_view(&page_view(""), &ctx("203.0.113.23"))
            .await;
        assert!(result.is_err());
        assert!(recorder.store().get_session("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn honeypot_flow_end_to_end() {
        let recorder = recorder().await;
        let ctx = ctx("203.0.113.24");

        recorder.record_visitor(&visitor("abc"), &ctx).await.unwrap();
        let before = recorder.store().get_session("abc").await.unwrap().unwrap();
        assert_eq!(before.total_pages, 1);

        let level = recorder.record_honeypot(&honeypot("abc", "admin"), &ctx).await.unwrap();
        assert_eq!(level, ThreatLevel::High);

        let after = recorder.store().get_session("abc").await.unwrap().unwrap();
        assert!(after.triggered_honeypot);
        assert!(after.is_suspicious);
        assert_eq!(after.total_pages, 1, "honeypot events do not touch page counters");

        let stats = recorder.store().dashboard_stats().await.unwrap();
        assert_eq!(stats.honeypot.total_alerts, 1);
        assert_eq!(stats.honeypot.high_threats, 1);
        assert_eq!(stats.recent_alerts[0].threat_level, "high");
        assert_eq!(stats.recent_alerts[0].country, "DE");
    }

    #[tokio::test]
    async fn honeypot_first_contact_creates_flagged_session() {
        let recorder = recorder().await;
        let token = Uuid::new_v4().to_string();

        recorder
            .record_honeypot(&honeypot(&token, "hidden-link"), &ctx("203.0.113.25"))
            .await
            .unwrap();

        let row = recorder.store().get_session(&token).await.unwrap().unwrap();
        assert!(row.triggered_honeypot);
        assert!(row.is_suspicious);
    }

    #[tokio::test]
    async fn flags_survive_later_events() {
        let recorder = recorder().await;
        let token = Uuid::new_v4().to_string();
        let ctx = ctx("203.0.113.26");

        recorder.record_honeypot(&honeypot(&token, "env"), &ctx).await.unwrap();
        recorder.record_visitor(&visitor(&token), &ctx).await.unwrap();
        recorder.record_page_view(&page_view(&token), &ctx).await.unwrap();

        let row = recorder.store().get_session(&token).await.unwrap().unwrap();
        assert!(row.triggered_honeypot, "flag must never revert");
        assert!(row.is_suspicious);
    }

    #[tokio::test]
    async fn element_text_is_truncated_before_storage() {
        let recorder = recorder().await;
        let token = Uuid::new_v4().to_string();

        let click = ClickPayload {
            session_id: token.clone(),
            element_type: "P".to_string(),
            element_id: None,
            element_class: None,
            element_text: Some("y".repeat(500)),
            page_url: "https://example.com/".to_string(),
            x: 1,
            y: 1,
        };
        recorder.record_click(&click, &ctx("203.0.113.27")).await.unwrap();

        let stored: String = sqlx::query_scalar(
            "SELECT element_text FROM click_events WHERE session_id = ?1",
        )
        .bind(&token)
        .fetch_one(recorder.store().pool())
        .await
        .unwrap();
        assert_eq!(stored.chars().count(), 100);
    }
}
