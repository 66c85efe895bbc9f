use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use crate::error::SourceError;
use crate::ledger::models::Quote;
use crate::sources::html::{fetch_page, parse_price, quote_from, selector, text_of};
use crate::sources::traits::QuoteSource;

pub const CRONISTA_URL: &str = "https://www.cronista.com/MercadosOnline/moneda.html?id=ARSB";

/// Cronista renders buy and sell as the first two table cells
pub struct CronistaSource {
    client: Client,
    url: String,
}

impl CronistaSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn extract(&self, body: &str) -> Result<Quote, SourceError> {
        let document = Html::parse_document(body);
        let cells = selector("td")?;
        let mut cells = document.select(&cells);

        let buy = cells.next().ok_or(SourceError::MissingMarkup("td:eq(0)"))?;
        let sell = cells.next().ok_or(SourceError::MissingMarkup("td:eq(1)"))?;

        quote_from(
            parse_price(&text_of(buy))?,
            parse_price(&text_of(sell))?,
            &self.url,
        )
    }
}

#[async_trait]
impl QuoteSource for CronistaSource {
    fn name(&self) -> &'static str {
        "Cronista"
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_quote(&self) -> Result<Quote, SourceError> {
        let body = fetch_page(&self.client, &self.url).await?;
        self.extract(&body)
    }
}
