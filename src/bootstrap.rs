use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{sync::Arc, time::Duration};
use tracing::info;

use crate::{
    api::handler::AppState,
    config::Config,
    error::{AppError, AppResult},
    ledger::{models::CurrencyGroup, QuoteRecorder, QuoteRepository},
    quote_engine::{QuoteAggregator, QuoteService, ResultCache},
    refresh::{RefreshConfig, RefreshScheduler},
    sources::{default_registry, html::build_client},
};

pub async fn initialize_app_state(config: &Config) -> AppResult<AppState> {
    info!("Initializing application components ...");

    // Database pool
    let pool = initialize_database(&config.database_url).await?;
    let recorder: Arc<dyn QuoteRecorder> = Arc::new(QuoteRepository::new(pool));

    // Quote sources
    let client = build_client(config.fetch_timeout())
        .map_err(|e| AppError::Config(format!("HTTP client: {}", e)))?;
    let registry = default_registry(client);
    for currency in CurrencyGroup::all() {
        info!("✅ {} sources: {:?}", currency, registry.source_names(currency));
    }

    let aggregator = Arc::new(QuoteAggregator::new(registry, recorder.clone()));

    let cache = ResultCache::new(config.cache_ttl());
    info!("✅ Result cache initialized ({}s TTL)", config.cache_ttl_secs);

    let quote_service = Arc::new(QuoteService::new(
        aggregator,
        recorder,
        cache,
        config.strict_currency,
    ));
    if config.strict_currency {
        info!("✅ Strict currency validation enabled");
    }

    // Keep the cache warm in the background
    let scheduler = RefreshScheduler::new(
        RefreshConfig {
            interval: config.refresh_interval(),
        },
        quote_service.clone(),
    );
    scheduler.start();
    info!("✅ Quote refresh task started (every {}s)", config.refresh_interval().as_secs());

    Ok(AppState { quote_service })
}

async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("📊 Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await?;

    // Run migrations
    info!("🔄 Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("✓ Database initialized");
    Ok(pool)
}
