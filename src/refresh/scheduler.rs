use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

use crate::quote_engine::QuoteService;

/// Refresh schedule configuration
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between refresh cycles
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

/// Fixed-interval task that keeps the result cache warm
pub struct RefreshScheduler {
    config: RefreshConfig,
    service: Arc<QuoteService>,
}

impl RefreshScheduler {
    pub fn new(config: RefreshConfig, service: Arc<QuoteService>) -> Self {
        Self { config, service }
    }

    /// Start the refresh loop (runs in background). The first cycle runs
    /// immediately. Not awaited on shutdown.
    pub fn start(&self) -> JoinHandle<()> {
        let config = self.config.clone();
        let service = self.service.clone();

        tokio::spawn(async move { Self::run(&config, &service).await })
    }

    async fn run(config: &RefreshConfig, service: &Arc<QuoteService>) {
        let mut ticker = interval(config.interval);
        // A slow cycle pushes the next one back instead of bunching ticks
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            info!("⏰ Scheduled fetch: refreshing quotes");
            let all = service.refresh().await;
            info!(
                "✓ Refresh cycle completed (ARS: {}, BRL: {})",
                all.ars.len(),
                all.brl.len()
            );
        }
    }
}
