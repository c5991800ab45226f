/// Schema applied at startup. Every statement is `IF NOT EXISTS`, so the
/// batch is safe to re-run on every boot.
///
/// The event tables are append-only logs with no uniqueness constraints;
/// `session_summary` is the derived aggregate and carries the UNIQUE
/// session_id that the upsert statements conflict on.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS visitor_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    ip_address TEXT NOT NULL,
    user_agent TEXT NOT NULL,
    referrer TEXT NOT NULL,
    landing_page TEXT NOT NULL,
    country TEXT NOT NULL,
    city TEXT NOT NULL,
    region TEXT NOT NULL,
    latitude REAL,
    longitude REAL,
    device_type TEXT NOT NULL,
    browser TEXT NOT NULL,
    os TEXT NOT NULL,
    screen_resolution TEXT NOT NULL,
    language TEXT NOT NULL,
    timezone TEXT NOT NULL,
    is_bot INTEGER NOT NULL DEFAULT 0,
    bot_name TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS page_view_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    page_url TEXT NOT NULL,
    page_title TEXT NOT NULL,
    time_on_page INTEGER NOT NULL DEFAULT 0,
    scroll_depth INTEGER NOT NULL DEFAULT 0,
    clicks_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS click_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    element_type TEXT NOT NULL,
    element_id TEXT,
    element_class TEXT,
    element_text TEXT,
    page_url TEXT NOT NULL,
    x_position INTEGER NOT NULL,
    y_position INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS honeypot_alerts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    ip_address TEXT NOT NULL,
    user_agent TEXT NOT NULL,
    trap_type TEXT NOT NULL,
    trap_url TEXT NOT NULL,
    request_method TEXT NOT NULL,
    request_headers TEXT NOT NULL,
    request_body TEXT,
    threat_level TEXT NOT NULL,
    country TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contact_submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    ip_address TEXT NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    message TEXT NOT NULL,
    user_agent TEXT NOT NULL,
    country TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS session_summary (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL UNIQUE,
    ip_address TEXT NOT NULL,
    total_pages INTEGER NOT NULL DEFAULT 0,
    total_clicks INTEGER NOT NULL DEFAULT 0,
    triggered_honeypot INTEGER NOT NULL DEFAULT 0,
    is_suspicious INTEGER NOT NULL DEFAULT 0,
    first_visit TEXT NOT NULL,
    last_visit TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_visitor_session ON visitor_events(session_id);
CREATE INDEX IF NOT EXISTS idx_visitor_ip ON visitor_events(ip_address);
CREATE INDEX IF NOT EXISTS idx_page_view_session ON page_view_events(session_id);
CREATE INDEX IF NOT EXISTS idx_click_session ON click_events(session_id);
CREATE INDEX IF NOT EXISTS idx_honeypot_ip ON honeypot_alerts(ip_address);
CREATE INDEX IF NOT EXISTS idx_honeypot_created ON honeypot_alerts(created_at);
CREATE INDEX IF NOT EXISTS idx_session_summary_token ON session_summary(session_id);
"#;
