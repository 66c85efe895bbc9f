use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::models::{CurrencyGroup, Quote, StoredQuote};
use crate::error::AppResult;

/// History collaborator for fetched quotes.
#[async_trait]
pub trait QuoteRecorder: Send + Sync {
    async fn record_quote(&self, currency: CurrencyGroup, quote: &Quote) -> AppResult<()>;

    /// Quotes stored within the last `minutes`, newest first
    async fn recent_quotes(&self, currency: CurrencyGroup, minutes: u32) -> AppResult<Vec<StoredQuote>>;
}

/// Postgres-backed quote history
pub struct QuoteRepository {
    pub pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRecorder for QuoteRepository {
    async fn record_quote(&self, currency: CurrencyGroup, quote: &Quote) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO quotes (currency, buy_price, sell_price, source)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(currency.as_str())
        .bind(quote.buy_price)
        .bind(quote.sell_price)
        .bind(&quote.source)
        .execute(&self.pool)
        .await?;

        debug!("💾 Recorded {} quote from {}", currency, quote.source);
        Ok(())
    }

    async fn recent_quotes(&self, currency: CurrencyGroup, minutes: u32) -> AppResult<Vec<StoredQuote>> {
        let rows = sqlx::query_as::<_, StoredQuote>(
            r#"
            SELECT id, currency, buy_price, sell_price, source, created_at
            FROM quotes
            WHERE currency = $1
              AND created_at > NOW() - make_interval(mins => $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(currency.as_str())
        .bind(minutes as i32)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
