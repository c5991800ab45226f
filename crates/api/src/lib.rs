pub mod context;
pub mod error;
pub mod mail;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use sitesentry_common::AppConfig;
use sitesentry_storage::Store;

use crate::mail::{LogMailer, Mailer};
use crate::state::SharedState;

pub use state::{AppState, SharedState as SharedStateType, TrackerMetrics};

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Event ingestion
        .route("/api/track/visitor", post(routes::track::record_visitor))
        .route("/api/track/pageview", post(routes::track::record_page_view))
        .route("/api/track/click", post(routes::track::record_click))
        .route("/api/track/honeypot", post(routes::track::record_honeypot))
        // Contact intake (rate-limited)
        .route("/api/contact", post(routes::contact::submit_contact))
        // Operator dashboard
        .route("/api/admin/stats", get(routes::stats::get_stats))
        // Decoy surface
        .route("/api/users", get(routes::decoy::fake_users))
        // Client script
        .route("/track.js", get(routes::script::get_tracking_script))
        // Health check
        .route("/api/health", get(routes::health::health_check))
        // Prometheus metrics
        .route("/api/metrics", get(routes::metrics::get_metrics))
        // Attach shared state and middleware
        .with_state(state)
        .layer(cors)
}

/// Start the API server on the configured address.
///
/// This function will block until the server is shut down.
pub async fn run_server(state: SharedState, listen_addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("API server listening on {}", listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Convenience constructor: assemble a SharedState with the default
/// logging mailer.
pub fn new_shared_state(config: AppConfig, store: Store) -> SharedState {
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(config.contact.notify_to.clone()));
    Arc::new(AppState::new(config, store, mailer))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use sitesentry_common::config::ServerConfig;

    async fn base_state(mailer: Arc<dyn Mailer>) -> SharedState {
        let config = AppConfig {
            server: ServerConfig {
                listen: "127.0.0.1:0".to_string(),
                admin: Default::default(),
            },
            database: Default::default(),
            rate_limit: Default::default(),
            tracking: Default::default(),
            contact: Default::default(),
        };
        let store = Store::connect_in_memory().await.unwrap();
        Arc::new(AppState::new(config, store, mailer))
    }

    pub(crate) async fn test_state() -> SharedState {
        base_state(Arc::new(LogMailer::new("owner@test"))).await
    }

    pub(crate) async fn test_state_with_mailer(mailer: Arc<dyn Mailer>) -> SharedState {
        base_state(mailer).await
    }
}
