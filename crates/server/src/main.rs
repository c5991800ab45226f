use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use sitesentry_common::AppConfig;
use sitesentry_storage::Store;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    // Parse command-line args for config path
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/sitesentry.yaml".to_string());

    info!(config_path = %config_path, "starting SiteSentry");

    // Load configuration
    let config = AppConfig::load(&config_path)?;

    // Open the store and apply the schema
    let store = Store::connect(&config.database).await?;

    // Assemble shared state and start the limiter's eviction loop
    let listen_addr = config.server.listen.clone();
    let state = sitesentry_api::new_shared_state(config, store);
    state.limiter.start_cleanup_task();

    info!("SiteSentry started successfully");
    sitesentry_api::run_server(state, &listen_addr).await
}
