use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::error;

use crate::ledger::models::CurrencyGroup;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] MigrateError),

    #[error("No source returned quotes for {0}")]
    QuotesUnavailable(CurrencyGroup),

    #[error("Average unavailable for {0}")]
    AverageUnavailable(CurrencyGroup),

    #[error("Unsupported currency: {0}")]
    InvalidCurrency(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure of a single quote source. Never propagates past the fetcher.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Markup not found: {0}")]
    MissingMarkup(&'static str),

    #[error("Invalid selector: {0}")]
    InvalidSelector(&'static str),

    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),
}

/// API error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            AppError::QuotesUnavailable(currency) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "QUOTES_UNAVAILABLE",
                "Unable to fetch quotes from sources".to_string(),
                Some(serde_json::json!({ "currency": currency })),
            ),
            AppError::AverageUnavailable(currency) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AVERAGE_UNAVAILABLE",
                "Unable to calculate average".to_string(),
                Some(serde_json::json!({ "currency": currency })),
            ),
            AppError::InvalidCurrency(raw) => (
                StatusCode::BAD_REQUEST,
                "INVALID_CURRENCY",
                format!("Unsupported currency: {}", raw),
                Some(serde_json::json!({ "supported": CurrencyGroup::all() })),
            ),
            other => {
                error!("❌ Request failed: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
