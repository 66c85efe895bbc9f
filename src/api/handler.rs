use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::models::*;
use crate::{
    error::AppResult,
    quote_engine::{service::MAX_HISTORY_MINUTES, QuoteService},
};

/// Default `/history` window in minutes
const DEFAULT_HISTORY_MINUTES: u32 = 1;

#[derive(Clone)]
pub struct AppState {
    pub quote_service: Arc<QuoteService>,
}

/// Service description
/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Currency Exchange API",
        endpoints: EndpointList {
            quotes: "GET /quotes?currency=ARS|BRL",
            average: "GET /average?currency=ARS|BRL",
            slippage: "GET /slippage?currency=ARS|BRL",
            history: "GET /history?currency=ARS|BRL&minutes=N",
            health: "GET /health",
        },
    })
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

/// Quotes from every reachable source
/// GET /quotes?currency=ARS|BRL
pub async fn get_quotes(
    State(state): State<AppState>,
    Query(params): Query<CurrencyQuery>,
) -> AppResult<Json<QuotesResponse>> {
    let currency = state.quote_service.resolve_currency(params.currency.as_deref())?;
    let result = state.quote_service.quotes(currency).await?;

    info!("Serving {} {} quotes (cached: {})", result.value.len(), currency, result.from_cache);

    Ok(Json(QuotesResponse {
        currency,
        count: result.value.len(),
        quotes: result.value,
        from_cache: result.from_cache,
    }))
}

/// Cross-source average
/// GET /average?currency=ARS|BRL
pub async fn get_average(
    State(state): State<AppState>,
    Query(params): Query<CurrencyQuery>,
) -> AppResult<Json<AverageResponse>> {
    let currency = state.quote_service.resolve_currency(params.currency.as_deref())?;
    let result = state.quote_service.average(currency).await?;

    Ok(Json(AverageResponse::new(result.value, result.from_cache)))
}

/// Per-source deviation from the average
/// GET /slippage?currency=ARS|BRL
pub async fn get_slippage(
    State(state): State<AppState>,
    Query(params): Query<CurrencyQuery>,
) -> AppResult<Json<SlippageResponse>> {
    let currency = state.quote_service.resolve_currency(params.currency.as_deref())?;
    let result = state.quote_service.slippage(currency).await?;

    Ok(Json(SlippageResponse {
        currency,
        count: result.value.len(),
        slippage: result.value,
        from_cache: result.from_cache,
    }))
}

/// Recently recorded quotes
/// GET /history?currency=ARS|BRL&minutes=N
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<HistoryResponse>> {
    let currency = state.quote_service.resolve_currency(params.currency.as_deref())?;
    let minutes = params
        .minutes
        .unwrap_or(DEFAULT_HISTORY_MINUTES)
        .clamp(1, MAX_HISTORY_MINUTES);
    let quotes = state.quote_service.history(currency, minutes).await?;

    Ok(Json(HistoryResponse {
        currency,
        minutes,
        count: quotes.len(),
        quotes,
    }))
}
