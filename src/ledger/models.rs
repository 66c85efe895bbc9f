use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use std::fmt;

/// Currency group served by the API. Selects the source set and the cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyGroup {
    Ars,
    Brl,
}

impl fmt::Display for CurrencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CurrencyGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyGroup::Ars => "ARS",
            CurrencyGroup::Brl => "BRL",
        }
    }

    /// Return all supported groups
    pub fn all() -> Vec<CurrencyGroup> {
        vec![CurrencyGroup::Ars, CurrencyGroup::Brl]
    }

    /// Exact match on a trimmed, case-insensitive code
    pub fn parse_strict(raw: &str) -> Option<CurrencyGroup> {
        match raw.trim().to_uppercase().as_str() {
            "ARS" => Some(CurrencyGroup::Ars),
            "BRL" => Some(CurrencyGroup::Brl),
            _ => None,
        }
    }

    /// `BRL` selects the BRL group, anything else falls back to ARS
    pub fn parse_lenient(raw: Option<&str>) -> CurrencyGroup {
        match raw {
            Some(code) if code.trim().eq_ignore_ascii_case("BRL") => CurrencyGroup::Brl,
            _ => CurrencyGroup::Ars,
        }
    }
}

/// One source's buy/sell pair. Both prices are strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub source: String,
}

impl Quote {
    /// Returns `None` unless both prices are positive
    pub fn new(buy_price: Decimal, sell_price: Decimal, source: impl Into<String>) -> Option<Self> {
        if buy_price <= Decimal::ZERO || sell_price <= Decimal::ZERO {
            return None;
        }
        Some(Self {
            buy_price,
            sell_price,
            source: source.into(),
        })
    }
}

/// Cross-source mean for one currency group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Average {
    pub average_buy_price: Decimal,
    pub average_sell_price: Decimal,
    pub currency: CurrencyGroup,
}

/// Relative deviation of one quote from the group average
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slippage {
    pub buy_price_slippage: Decimal,
    pub sell_price_slippage: Decimal,
    pub source: String,
}

/// Quotes for both groups, fetched together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupQuotes {
    pub ars: Vec<Quote>,
    pub brl: Vec<Quote>,
}

impl GroupQuotes {
    pub fn for_group(&self, group: CurrencyGroup) -> &[Quote] {
        match group {
            CurrencyGroup::Ars => &self.ars,
            CurrencyGroup::Brl => &self.brl,
        }
    }

    pub fn into_group(self, group: CurrencyGroup) -> Vec<Quote> {
        match group {
            CurrencyGroup::Ars => self.ars,
            CurrencyGroup::Brl => self.brl,
        }
    }
}

/// Row of the `quotes` history table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredQuote {
    pub id: i32,
    pub currency: String,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub source: String,
    pub created_at: DateTime<Utc>,
}
