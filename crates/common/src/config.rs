use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level SiteSentry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared secret compared against the `Authorization: Bearer` header of
    /// the operator stats endpoint.
    #[serde(default = "default_admin_token")]
    pub token: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token: default_admin_token(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Fixed-window limiter settings for the contact-intake path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// When true, the generated client script appends the hidden decoy
    /// links to the page so link-following scanners hit the traps.
    #[serde(default = "default_true")]
    pub inject_trap_links: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            inject_trap_links: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Display address the delivery seam hands submissions to.
    #[serde(default = "default_notify_to")]
    pub notify_to: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            notify_to: default_notify_to(),
        }
    }
}

// Default value helpers
fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_admin_token() -> String {
    "change-me-in-production".to_string()
}
fn default_db_path() -> PathBuf {
    PathBuf::from("sitesentry.sqlite3")
}
fn default_max_connections() -> u32 {
    5
}
fn default_window_ms() -> u64 {
    60_000
}
fn default_max_requests() -> u64 {
    5
}
fn default_true() -> bool {
    true
}
fn default_notify_to() -> String {
    "owner@localhost".to_string()
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.listen.is_empty() {
            anyhow::bail!("server.listen must not be empty");
        }
        if self.rate_limit.window_ms == 0 {
            anyhow::bail!("rate_limit.window_ms must be greater than zero");
        }
        if self.rate_limit.max_requests == 0 {
            anyhow::bail!("rate_limit.max_requests must be greater than zero");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be greater than zero");
        }
        if self.server.admin.token == default_admin_token() {
            tracing::warn!("admin token is the built-in default; set server.admin.token");
        }
        Ok(())
    }
}
