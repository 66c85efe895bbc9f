mod api;
mod bootstrap;
mod config;
mod error;
mod ledger;
mod middleware;
mod quote_engine;
mod refresh;
mod server;
mod sources;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,fx_quotes=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenv::dotenv().ok();

    // Initialize tracing
    init_tracing();

    info!("🚀 Starting Currency Exchange API");

    let config = Config::from_env()?;

    let state = match bootstrap::initialize_app_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Failed to start server: {}", e);
            return Err(e.into());
        }
    };

    // Create HTTP server
    let app = server::create_app(state, config.request_timeout());

    // Run the Server
    server::run_server(app, &config.bind_address).await?;

    info!("👋 Shutdown complete");

    Ok(())
}
