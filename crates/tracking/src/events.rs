use serde::Deserialize;

use sitesentry_common::{TelemetryError, TelemetryResult};

/// Click element text is cut to this many characters before it is stored.
pub const ELEMENT_TEXT_MAX: usize = 100;

/// Request-derived context, read from the trusted reverse-proxy headers --
/// never from the request body. Missing values default to `"unknown"`
/// (coordinates to `None`).
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub ip: String,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub country: String,
    pub city: String,
    pub region: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ClientContext {
    /// Context with every field at its absent-header default; tests and the
    /// decoy endpoint use this.
    pub fn unknown() -> Self {
        Self {
            ip: "unknown".to_string(),
            user_agent: "unknown".to_string(),
            referrer: None,
            country: "unknown".to_string(),
            city: "unknown".to_string(),
            region: "unknown".to_string(),
            latitude: None,
            longitude: None,
        }
    }
}

/// Body of `POST /api/track/visitor`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorPayload {
    pub session_id: String,
    pub landing_page: String,
    #[serde(default)]
    pub referrer: Option<String>,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub screen_resolution: String,
    pub language: String,
    pub timezone: String,
    pub is_bot: bool,
    #[serde(default)]
    pub bot_name: Option<String>,
}

/// Body of `POST /api/track/pageview`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewPayload {
    pub session_id: String,
    pub page_url: String,
    pub page_title: String,
    pub time_on_page: i64,
    pub scroll_depth: i64,
    pub clicks_count: i64,
}

/// Body of `POST /api/track/click`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickPayload {
    pub session_id: String,
    pub element_type: String,
    #[serde(default)]
    pub element_id: Option<String>,
    #[serde(default)]
    pub element_class: Option<String>,
    #[serde(default)]
    pub element_text: Option<String>,
    pub page_url: String,
    pub x: i64,
    pub y: i64,
}

/// Body of `POST /api/track/honeypot`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneypotPayload {
    pub session_id: String,
    pub trap_type: String,
    pub trap_url: String,
    #[serde(default)]
    pub method: Option<String>,
    /// Captured request headers, passed through as-is.
    #[serde(default)]
    pub headers: Option<serde_json::Value>,
    #[serde(default)]
    pub body: Option<String>,
}

/// The structural check shared by every event kind: the session token is an
/// opaque string, but it must be present.
fn require_session_id(session_id: &str) -> TelemetryResult<()> {
    if session_id.trim().is_empty() {
        return Err(TelemetryError::validation("sessionId must not be empty"));
    }
    Ok(())
}

impl VisitorPayload {
    pub fn validate(&self) -> TelemetryResult<()> {
        require_session_id(&self.session_id)
    }
}

impl PageViewPayload {
    pub fn validate(&self) -> TelemetryResult<()> {
        require_session_id(&self.session_id)
    }
}

impl ClickPayload {
    pub fn validate(&self) -> TelemetryResult<()> {
        require_session_id(&self.session_id)
    }
}

impl HoneypotPayload {
    pub fn validate(&self) -> TelemetryResult<()> {
        require_session_id(&self.session_id)?;
        if self.trap_type.trim().is_empty() {
            return Err(TelemetryError::validation("trapType must not be empty"));
        }
        Ok(())
    }
}

/// Cut `text` to at most [`ELEMENT_TEXT_MAX`] characters, respecting char
/// boundaries.
pub fn truncate_element_text(text: &str) -> String {
    match text.char_indices().nth(ELEMENT_TEXT_MAX) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
