//! Test doubles for sources and the history store.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{AppError, AppResult, SourceError};
use crate::ledger::models::{CurrencyGroup, Quote, StoredQuote};
use crate::ledger::repository::QuoteRecorder;
use crate::sources::{QuoteSource, SourceRegistry};

/// Tracks how many fetches run at once
#[derive(Default)]
pub struct Concurrency {
    current: AtomicUsize,
    pub peak: AtomicUsize,
}

/// Source returning a fixed quote, or failing when `quote` is `None`
pub struct StaticSource {
    pub name: &'static str,
    pub quote: Option<Quote>,
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
    pub concurrency: Arc<Concurrency>,
}

impl StaticSource {
    pub fn ok(name: &'static str, buy: Decimal, sell: Decimal) -> Self {
        Self {
            name,
            quote: Quote::new(buy, sell, format!("https://{}.test", name)),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            concurrency: Arc::new(Concurrency::default()),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            quote: None,
            ..Self::ok(name, Decimal::ONE, Decimal::ONE)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_concurrency(mut self, concurrency: Arc<Concurrency>) -> Self {
        self.concurrency = concurrency;
        self
    }
}

#[async_trait]
impl QuoteSource for StaticSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn url(&self) -> &str {
        "https://static.test"
    }

    async fn fetch_quote(&self) -> Result<Quote, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.concurrency.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.concurrency.peak.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.concurrency.current.fetch_sub(1, Ordering::SeqCst);
        self.quote.clone().ok_or(SourceError::Status(503))
    }
}

/// Source that panics mid-fetch
pub struct PanickingSource;

#[async_trait]
impl QuoteSource for PanickingSource {
    fn name(&self) -> &'static str {
        "Panicking"
    }

    fn url(&self) -> &str {
        "https://panic.test"
    }

    async fn fetch_quote(&self) -> Result<Quote, SourceError> {
        panic!("scraper bug");
    }
}

/// In-memory history store
#[derive(Default)]
pub struct MemoryRecorder {
    pub fail: bool,
    /// Time each write takes before it lands, like a stalled pool
    pub delay: Duration,
    pub recorded: Mutex<Vec<(CurrencyGroup, Quote)>>,
}

impl MemoryRecorder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    /// Yield until `n` background writes have landed
    pub async fn wait_for(&self, n: usize) {
        for _ in 0..1_000 {
            if self.count() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} recorded quotes, got {}", n, self.count());
    }
}

#[async_trait]
impl QuoteRecorder for MemoryRecorder {
    async fn record_quote(&self, currency: CurrencyGroup, quote: &Quote) -> AppResult<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.recorded.lock().unwrap().push((currency, quote.clone()));
        Ok(())
    }

    async fn recent_quotes(&self, currency: CurrencyGroup, _minutes: u32) -> AppResult<Vec<StoredQuote>> {
        let recorded = self.recorded.lock().unwrap();
        Ok(recorded
            .iter()
            .rev()
            .filter(|(group, _)| *group == currency)
            .enumerate()
            .map(|(i, (group, quote))| StoredQuote {
                id: i as i32 + 1,
                currency: group.to_string(),
                buy_price: quote.buy_price,
                sell_price: quote.sell_price,
                source: quote.source.clone(),
                created_at: Utc::now(),
            })
            .collect())
    }
}

/// Registry with the given sources per group
pub fn registry(ars: Vec<Arc<dyn QuoteSource>>, brl: Vec<Arc<dyn QuoteSource>>) -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    for source in ars {
        registry.register(CurrencyGroup::Ars, source);
    }
    for source in brl {
        registry.register(CurrencyGroup::Brl, source);
    }
    registry
}
