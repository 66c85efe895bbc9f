use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::ledger::models::{Average, CurrencyGroup, GroupQuotes, Quote, Slippage, StoredQuote};
use crate::ledger::repository::QuoteRecorder;
use crate::quote_engine::aggregator::QuoteAggregator;
use crate::quote_engine::result_cache::ResultCache;
use crate::quote_engine::statistics::{calculate_average, calculate_slippage};

/// Longest history window served, in minutes
pub const MAX_HISTORY_MINUTES: u32 = 24 * 60;

/// Result kinds served by the API, each cached under its own key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Quotes,
    Average,
    Slippage,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Quotes => "quotes",
            ResultKind::Average => "average",
            ResultKind::Slippage => "slippage",
        }
    }

    /// Cache key, e.g. `quotes_ARS`
    pub fn cache_key(&self, currency: CurrencyGroup) -> String {
        format!("{}_{}", self.as_str(), currency)
    }
}

#[derive(Debug, Clone)]
pub enum CachedResult {
    Quotes(Vec<Quote>),
    Average(Average),
    Slippage(Vec<Slippage>),
}

/// A served value and whether it came from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub from_cache: bool,
}

impl<T> Cached<T> {
    fn hit(value: T) -> Self {
        Self { value, from_cache: true }
    }

    fn fresh(value: T) -> Self {
        Self { value, from_cache: false }
    }
}

/// Cache-first access to quotes, averages and slippage
pub struct QuoteService {
    aggregator: Arc<QuoteAggregator>,
    recorder: Arc<dyn QuoteRecorder>,
    cache: ResultCache<CachedResult>,
    strict_currency: bool,
}

impl QuoteService {
    pub fn new(
        aggregator: Arc<QuoteAggregator>,
        recorder: Arc<dyn QuoteRecorder>,
        cache: ResultCache<CachedResult>,
        strict_currency: bool,
    ) -> Self {
        Self {
            aggregator,
            recorder,
            cache,
            strict_currency,
        }
    }

    pub fn cache(&self) -> &ResultCache<CachedResult> {
        &self.cache
    }

    /// Map the `currency` query value to a group.
    ///
    /// A missing value is ARS. Otherwise `BRL` (any case) is BRL and every
    /// other value is ARS, unless strict mode rejects unknown codes.
    pub fn resolve_currency(&self, raw: Option<&str>) -> AppResult<CurrencyGroup> {
        let Some(code) = raw.filter(|c| !c.trim().is_empty()) else {
            return Ok(CurrencyGroup::Ars);
        };

        if self.strict_currency {
            return CurrencyGroup::parse_strict(code)
                .ok_or_else(|| AppError::InvalidCurrency(code.to_string()));
        }

        let group = CurrencyGroup::parse_lenient(Some(code));
        if CurrencyGroup::parse_strict(code).is_none() {
            debug!("Unknown currency {:?}, serving {}", code, group);
        }
        Ok(group)
    }

    pub async fn quotes(&self, currency: CurrencyGroup) -> AppResult<Cached<Vec<Quote>>> {
        let key = ResultKind::Quotes.cache_key(currency);
        if let Some(CachedResult::Quotes(quotes)) = self.cache.get(&key).await {
            return Ok(Cached::hit(quotes));
        }

        let quotes = self.fetch_group(currency).await?;
        self.cache.set(&key, CachedResult::Quotes(quotes.clone())).await;

        Ok(Cached::fresh(quotes))
    }

    pub async fn average(&self, currency: CurrencyGroup) -> AppResult<Cached<Average>> {
        let key = ResultKind::Average.cache_key(currency);
        if let Some(CachedResult::Average(average)) = self.cache.get(&key).await {
            return Ok(Cached::hit(average));
        }

        let quotes = self.fetch_group(currency).await?;
        let average = derive_average(&quotes, currency)?;
        self.cache.set(&key, CachedResult::Average(average.clone())).await;

        Ok(Cached::fresh(average))
    }

    pub async fn slippage(&self, currency: CurrencyGroup) -> AppResult<Cached<Vec<Slippage>>> {
        let key = ResultKind::Slippage.cache_key(currency);
        if let Some(CachedResult::Slippage(slippage)) = self.cache.get(&key).await {
            return Ok(Cached::hit(slippage));
        }

        let quotes = self.fetch_group(currency).await?;
        let average = derive_average(&quotes, currency)?;
        let slippage = derive_slippage(&quotes, &average)?;
        self.cache.set(&key, CachedResult::Slippage(slippage.clone())).await;

        Ok(Cached::fresh(slippage))
    }

    /// Fetch both groups and overwrite every result kind of each group that
    /// returned quotes. Groups with no quotes keep their current entries.
    pub async fn refresh(&self) -> GroupQuotes {
        let all = self.aggregator.fetch_all_quotes().await;

        for currency in CurrencyGroup::all() {
            let quotes = all.for_group(currency);
            if quotes.is_empty() {
                warn!("⚠️  Refresh skipped {}: no quotes", currency);
                continue;
            }

            self.cache
                .set(&ResultKind::Quotes.cache_key(currency), CachedResult::Quotes(quotes.to_vec()))
                .await;

            let derived = derive_average(quotes, currency)
                .and_then(|average| derive_slippage(quotes, &average).map(|slippage| (average, slippage)));

            match derived {
                Ok((average, slippage)) => {
                    self.cache
                        .set(&ResultKind::Average.cache_key(currency), CachedResult::Average(average))
                        .await;
                    self.cache
                        .set(&ResultKind::Slippage.cache_key(currency), CachedResult::Slippage(slippage))
                        .await;
                }
                Err(e) => warn!("⚠️  Refresh could not derive {} statistics: {}", currency, e),
            }

            info!("🔄 Refreshed {} results from {} quotes", currency, quotes.len());
        }

        all
    }

    /// Stored quotes of the last `minutes`, clamped to 1..=MAX_HISTORY_MINUTES
    pub async fn history(&self, currency: CurrencyGroup, minutes: u32) -> AppResult<Vec<StoredQuote>> {
        let minutes = minutes.clamp(1, MAX_HISTORY_MINUTES);
        self.recorder.recent_quotes(currency, minutes).await
    }

    async fn fetch_group(&self, currency: CurrencyGroup) -> AppResult<Vec<Quote>> {
        let quotes = self.aggregator.fetch_all_quotes().await.into_group(currency);
        if quotes.is_empty() {
            return Err(AppError::QuotesUnavailable(currency));
        }
        Ok(quotes)
    }
}

fn derive_average(quotes: &[Quote], currency: CurrencyGroup) -> AppResult<Average> {
    calculate_average(quotes, currency).ok_or(AppError::AverageUnavailable(currency))
}

fn derive_slippage(quotes: &[Quote], average: &Average) -> AppResult<Vec<Slippage>> {
    calculate_slippage(quotes, average).ok_or(AppError::AverageUnavailable(average.currency))
}
