use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use crate::error::SourceError;
use crate::ledger::models::Quote;
use crate::sources::html::{fetch_page, parse_price, quote_from, selector, text_of};
use crate::sources::traits::QuoteSource;

pub const WISE_URL: &str = "https://wise.com/es/currency-converter/brl-to-usd-rate";

/// Wise publishes a single mid-market rate, used for both sides
pub struct WiseSource {
    client: Client,
    url: String,
}

impl WiseSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn extract(&self, body: &str) -> Result<Quote, SourceError> {
        let document = Html::parse_document(body);
        let rate_selector = selector(r#"span[data-test-id="mid-market-rate"]"#)?;

        let text = document
            .select(&rate_selector)
            .next()
            .map(text_of)
            .ok_or(SourceError::MissingMarkup("span[data-test-id=mid-market-rate]"))?;

        let token = text.split_whitespace().next().unwrap_or_default();
        let rate = parse_price(token)?;

        quote_from(rate, rate, &self.url)
    }
}

#[async_trait]
impl QuoteSource for WiseSource {
    fn name(&self) -> &'static str {
        "Wise"
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_quote(&self) -> Result<Quote, SourceError> {
        let body = fetch_page(&self.client, &self.url).await?;
        self.extract(&body)
    }
}
