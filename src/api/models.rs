use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::models::{Average, CurrencyGroup, Quote, Slippage, StoredQuote};

// ========== REQUEST MODELS ==========

/// `?currency=ARS|BRL`
#[derive(Debug, Default, Deserialize)]
pub struct CurrencyQuery {
    pub currency: Option<String>,
}

/// `?currency=ARS|BRL&minutes=N`
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub currency: Option<String>,
    pub minutes: Option<u32>,
}

// ========== RESPONSE MODELS ==========

#[derive(Debug, Serialize, Deserialize)]
pub struct QuotesResponse {
    pub currency: CurrencyGroup,
    pub quotes: Vec<Quote>,
    pub count: usize,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AverageResponse {
    pub average_buy_price: Decimal,
    pub average_sell_price: Decimal,
    pub currency: CurrencyGroup,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
}

impl AverageResponse {
    pub fn new(average: Average, from_cache: bool) -> Self {
        Self {
            average_buy_price: average.average_buy_price,
            average_sell_price: average.average_sell_price,
            currency: average.currency,
            from_cache,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlippageResponse {
    pub currency: CurrencyGroup,
    pub slippage: Vec<Slippage>,
    pub count: usize,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub currency: CurrencyGroup,
    pub minutes: u32,
    pub quotes: Vec<StoredQuote>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Service description served at `/`
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub endpoints: EndpointList,
}

#[derive(Debug, Serialize)]
pub struct EndpointList {
    pub quotes: &'static str,
    pub average: &'static str,
    pub slippage: &'static str,
    pub history: &'static str,
    pub health: &'static str,
}
