use anyhow::Result;
use tracing::info;

use helpdesk_notify_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!(
        "Starting help desk notification service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Prometheus metrics
    middleware::metrics::init_metrics();

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.to_pool_config()).await?;

    // Build application
    let app = app::create_app(config.clone(), pool)?;

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
