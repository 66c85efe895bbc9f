use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use crate::error::SourceError;
use crate::ledger::models::Quote;
use crate::sources::html::{fetch_page, first_containing, next_element, parse_price, quote_from, text_of};
use crate::sources::traits::QuoteSource;

pub const AMBITO_URL: &str = "https://www.ambito.com/contenidos/dolar.html";

/// Ambito labels each price with a "Compra"/"Venta" span followed by the value
pub struct AmbitoSource {
    client: Client,
    url: String,
}

impl AmbitoSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn extract(&self, body: &str) -> Result<Quote, SourceError> {
        let document = Html::parse_document(body);

        let buy = first_containing(&document, "span", "Compra")?
            .and_then(next_element)
            .ok_or(SourceError::MissingMarkup("span:contains(Compra) + *"))?;
        let sell = first_containing(&document, "span", "Venta")?
            .and_then(next_element)
            .ok_or(SourceError::MissingMarkup("span:contains(Venta) + *"))?;

        quote_from(
            parse_price(&text_of(buy))?,
            parse_price(&text_of(sell))?,
            &self.url,
        )
    }
}

#[async_trait]
impl QuoteSource for AmbitoSource {
    fn name(&self) -> &'static str {
        "Ambito"
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_quote(&self) -> Result<Quote, SourceError> {
        let body = fetch_page(&self.client, &self.url).await?;
        self.extract(&body)
    }
}
