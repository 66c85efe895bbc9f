use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use crate::error::SourceError;
use crate::ledger::models::Quote;
use crate::sources::html::{fetch_page, first_containing, parse_price, quote_from, text_of};
use crate::sources::traits::QuoteSource;

pub const NUBANK_URL: &str = "https://nubank.com.br/taxas-conversao/";

/// Nubank lists rates as "USD <rate>" spans
pub struct NubankSource {
    client: Client,
    url: String,
}

impl NubankSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn extract(&self, body: &str) -> Result<Quote, SourceError> {
        let document = Html::parse_document(body);

        let text = first_containing(&document, "span", "USD")?
            .map(text_of)
            .ok_or(SourceError::MissingMarkup("span:contains(USD)"))?;

        let token = text
            .split_whitespace()
            .nth(1)
            .ok_or(SourceError::MissingMarkup("span:contains(USD) rate"))?;
        let rate = parse_price(token)?;

        quote_from(rate, rate, &self.url)
    }
}

#[async_trait]
impl QuoteSource for NubankSource {
    fn name(&self) -> &'static str {
        "Nubank"
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_quote(&self) -> Result<Quote, SourceError> {
        let body = fetch_page(&self.client, &self.url).await?;
        self.extract(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reads_rate_after_currency_code() {
        let source = NubankSource::new(Client::new(), NUBANK_URL);
        let quote = source
            .extract("<span>EUR 6,01</span><span>USD 5,42</span><span>USD 9,99</span>")
            .unwrap();

        assert_eq!(quote.buy_price, dec!(5.42));
        assert_eq!(quote.sell_price, dec!(5.42));
    }

    #[test]
    fn test_code_without_rate() {
        let source = NubankSource::new(Client::new(), NUBANK_URL);
        assert!(source.extract("<span>USD</span>").is_err());
    }
}
