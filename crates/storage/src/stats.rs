//! Read-only aggregation for the operator dashboard.
//!
//! Everything here is derived from the append-only logs and the session
//! summary; no query in this module writes.

use serde::Serialize;

use sitesentry_common::{TelemetryError, TelemetryResult};

use crate::records::SessionSummary;
use crate::Store;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VisitorStats {
    pub total_sessions: i64,
    pub total_visitors: i64,
    pub unique_ips: i64,
    pub bot_visits: i64,
    pub geolocated_visits: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PageStats {
    pub total_page_views: i64,
    pub avg_time_on_page: f64,
    pub avg_scroll_depth: f64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HoneypotStats {
    pub total_alerts: i64,
    pub high_threats: i64,
    pub medium_threats: i64,
    pub low_threats: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AlertSummary {
    pub id: i64,
    pub ip_address: String,
    pub trap_type: String,
    pub trap_url: String,
    pub threat_level: String,
    pub country: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CountryCount {
    pub country: String,
    pub visits: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactStats {
    pub total_submissions: i64,
}

/// Everything the dashboard renders, gathered in one call.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub visitors: VisitorStats,
    pub pages: PageStats,
    pub honeypot: HoneypotStats,
    pub recent_alerts: Vec<AlertSummary>,
    pub top_countries: Vec<CountryCount>,
    pub contacts: ContactStats,
    pub suspicious_sessions: Vec<SessionSummary>,
}

impl Store {
    /// Aggregate counts across all entities for the operator dashboard.
    pub async fn dashboard_stats(&self) -> TelemetryResult<DashboardStats> {
        let visitors = sqlx::query_as::<_, VisitorStats>(
            "SELECT
                COUNT(DISTINCT session_id) AS total_sessions,
                COUNT(*) AS total_visitors,
                COUNT(DISTINCT ip_address) AS unique_ips,
                COUNT(*) FILTER (WHERE is_bot = 1) AS bot_visits,
                COUNT(*) FILTER (WHERE country != 'unknown') AS geolocated_visits
             FROM visitor_events",
        )
        .fetch_one(self.pool())
        .await
        .map_err(TelemetryError::storage)?;

        let pages = sqlx::query_as::<_, PageStats>(
            "SELECT
                COUNT(*) AS total_page_views,
                COALESCE(AVG(time_on_page), 0.0) AS avg_time_on_page,
                COALESCE(AVG(scroll_depth), 0.0) AS avg_scroll_depth
             FROM page_view_events",
        )
        .fetch_one(self.pool())
        .await
        .map_err(TelemetryError::storage)?;

        let honeypot = sqlx::query_as::<_, HoneypotStats>(
            "SELECT
                COUNT(*) AS total_alerts,
                COUNT(*) FILTER (WHERE threat_level = 'high') AS high_threats,
                COUNT(*) FILTER (WHERE threat_level = 'medium') AS medium_threats,
                COUNT(*) FILTER (WHERE threat_level = 'low') AS low_threats
             FROM honeypot_alerts",
        )
        .fetch_one(self.pool())
        .await
        .map_err(TelemetryError::storage)?;

        let recent_alerts = sqlx::query_as::<_, AlertSummary>(
            "SELECT id, ip_address, trap_type, trap_url, threat_level, country, created_at
             FROM honeypot_alerts
             ORDER BY created_at DESC
             LIMIT 10",
        )
        .fetch_all(self.pool())
        .await
        .map_err(TelemetryError::storage)?;

        let top_countries = sqlx::query_as::<_, CountryCount>(
            "SELECT country, COUNT(*) AS visits
             FROM visitor_events
             WHERE country != 'unknown'
             GROUP BY country
             ORDER BY visits DESC
             LIMIT 10",
        )
        .fetch_all(self.pool())
        .await
        .map_err(TelemetryError::storage)?;

        let contacts = sqlx::query_as::<_, ContactStats>(
            "SELECT COUNT(*) AS total_submissions FROM contact_submissions",
        )
        .fetch_one(self.pool())
        .await
        .map_err(TelemetryError::storage)?;

        let suspicious_sessions = sqlx::query_as::<_, SessionSummary>(
            "SELECT session_id, ip_address, total_pages, total_clicks,
                    triggered_honeypot, is_suspicious, first_visit, last_visit
             FROM session_summary
             WHERE is_suspicious = 1 OR triggered_honeypot = 1
             ORDER BY last_visit DESC
             LIMIT 20",
        )
        .fetch_all(self.pool())
        .await
        .map_err(TelemetryError::storage)?;

        Ok(DashboardStats {
            visitors,
            pages,
            honeypot,
            recent_alerts,
            top_countries,
            contacts,
            suspicious_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{EventKind, NewHoneypotAlert, NewVisitorEvent};

    fn visitor(session_id: &str, country: &str, is_bot: bool) -> NewVisitorEvent {
        NewVisitorEvent {
            session_id: session_id.to_string(),
            ip_address: "203.0.113.10".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            referrer: "direct".to_string(),
            landing_page: "https://example.com/".to_string(),
            country: country.to_string(),
            city: "unknown".to_string(),
            region: "unknown".to_string(),
            latitude: None,
            longitude: None,
            device_type: "desktop".to_string(),
            browser: "Firefox".to_string(),
            os: "Linux".to_string(),
            screen_resolution: "1920x1080".to_string(),
            language: "en-US".to_string(),
            timezone: "UTC".to_string(),
            is_bot,
            bot_name: None,
        }
    }

    fn alert(session_id: &str, level: &str) -> NewHoneypotAlert {
        NewHoneypotAlert {
            session_id: session_id.to_string(),
            ip_address: "203.0.113.11".to_string(),
            user_agent: "curl/8.0".to_string(),
            trap_type: "admin".to_string(),
            trap_url: "/admin-login".to_string(),
            request_method: "GET".to_string(),
            request_headers: "{}".to_string(),
            request_body: None,
            threat_level: level.to_string(),
            country: "unknown".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_database_yields_zeroed_stats() {
        let store = Store::connect_in_memory().await.unwrap();
        let stats = store.dashboard_stats().await.unwrap();

        assert_eq!(stats.visitors.total_visitors, 0);
        assert_eq!(stats.pages.total_page_views, 0);
        assert_eq!(stats.pages.avg_time_on_page, 0.0);
        assert_eq!(stats.honeypot.total_alerts, 0);
        assert!(stats.recent_alerts.is_empty());
        assert!(stats.suspicious_sessions.is_empty());
    }

    #[tokio::test]
    async fn counts_follow_the_logs() {
        let store = Store::connect_in_memory().await.unwrap();

        store.append_visitor_event(&visitor("s1", "DE", false)).await.unwrap();
        store.append_visitor_event(&visitor("s1", "DE", false)).await.unwrap();
        store.append_visitor_event(&visitor("s2", "unknown", true)).await.unwrap();
        store.append_honeypot_alert(&alert("s2", "high")).await.unwrap();
        store.append_honeypot_alert(&alert("s2", "low")).await.unwrap();
        store.flag_session_suspicious("s2", "203.0.113.11").await.unwrap();
        store.upsert_session("s1", "203.0.113.10", EventKind::Arrival).await.unwrap();

        let stats = store.dashboard_stats().await.unwrap();
        assert_eq!(stats.visitors.total_visitors, 3);
        assert_eq!(stats.visitors.total_sessions, 2);
        assert_eq!(stats.visitors.bot_visits, 1);
        assert_eq!(stats.visitors.geolocated_visits, 2);
        assert_eq!(stats.honeypot.total_alerts, 2);
        assert_eq!(stats.honeypot.high_threats, 1);
        assert_eq!(stats.honeypot.low_threats, 1);
        assert_eq!(stats.top_countries.len(), 1);
        assert_eq!(stats.top_countries[0].country, "DE");
        assert_eq!(stats.suspicious_sessions.len(), 1);
        assert_eq!(stats.suspicious_sessions[0].session_id, "s2");
    }
}
