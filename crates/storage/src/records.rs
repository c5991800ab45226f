use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event kinds the session aggregator distinguishes. Only page views and
/// clicks carry a counter delta; the other kinds touch timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrival,
    PageView,
    Click,
    Honeypot,
}

/// A visitor-arrival record, fully resolved server-side (client payload
/// merged with the request context from the edge headers).
#[derive(Debug, Clone)]
pub struct NewVisitorEvent {
    pub session_id: String,
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: String,
    pub landing_page: String,
    pub country: String,
    pub city: String,
    pub region: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub screen_resolution: String,
    pub language: String,
    pub timezone: String,
    pub is_bot: bool,
    pub bot_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPageView {
    pub session_id: String,
    pub page_url: String,
    pub page_title: String,
    pub time_on_page: i64,
    pub scroll_depth: i64,
    pub clicks_count: i64,
}

#[derive(Debug, Clone)]
pub struct NewClick {
    pub session_id: String,
    pub element_type: String,
    pub element_id: Option<String>,
    pub element_class: Option<String>,
    pub element_text: Option<String>,
    pub page_url: String,
    pub x_position: i64,
    pub y_position: i64,
}

#[derive(Debug, Clone)]
pub struct NewHoneypotAlert {
    pub session_id: String,
    pub ip_address: String,
    pub user_agent: String,
    pub trap_type: String,
    pub trap_url: String,
    pub request_method: String,
    /// Captured request headers, serialized as a JSON object.
    pub request_headers: String,
    pub request_body: Option<String>,
    /// Derived server-side, never client-supplied.
    pub threat_level: String,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct NewContactSubmission {
    pub session_id: String,
    pub ip_address: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub user_agent: String,
    pub country: String,
}

/// One row of the `session_summary` aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionSummary {
    pub session_id: String,
    pub ip_address: String,
    pub total_pages: i64,
    pub total_clicks: i64,
    pub triggered_honeypot: bool,
    pub is_suspicious: bool,
    pub first_visit: DateTime<Utc>,
    pub last_visit: DateTime<Utc>,
}
