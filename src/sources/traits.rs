use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::ledger::models::Quote;

/// A single upstream site that can produce one quote per request.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Page the quote is scraped from. Also used as the quote's `source`.
    fn url(&self) -> &str;

    async fn fetch_quote(&self) -> Result<Quote, SourceError>;

    /// Failures are logged here and never reach the caller
    async fn fetch(&self) -> Option<Quote> {
        match self.fetch_quote().await {
            Ok(quote) => {
                debug!(
                    "✓ {} quote: buy={} sell={}",
                    self.name(),
                    quote.buy_price,
                    quote.sell_price
                );
                Some(quote)
            }
            Err(e) => {
                warn!("⚠️  {} scrape failed ({}): {}", self.name(), self.url(), e);
                None
            }
        }
    }
}
