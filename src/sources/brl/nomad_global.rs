use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use crate::error::SourceError;
use crate::ledger::models::Quote;
use crate::sources::html::{closest, fetch_page, first_containing, parse_price, quote_from, selector, text_of};
use crate::sources::traits::QuoteSource;

pub const NOMAD_GLOBAL_URL: &str = "https://www.nomadglobal.com";

/// Nomad shows the rate as the second span of the card holding the "BRL" label
pub struct NomadGlobalSource {
    client: Client,
    url: String,
}

impl NomadGlobalSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn extract(&self, body: &str) -> Result<Quote, SourceError> {
        let document = Html::parse_document(body);
        let spans = selector("span")?;

        let card = first_containing(&document, "span", "BRL")?
            .and_then(|label| closest(label, "div"))
            .ok_or(SourceError::MissingMarkup("span:contains(BRL) closest div"))?;

        let rate = card
            .select(&spans)
            .nth(1)
            .map(text_of)
            .ok_or(SourceError::MissingMarkup("div span:eq(1)"))?;
        let rate = parse_price(&rate)?;

        quote_from(rate, rate, &self.url)
    }
}

#[async_trait]
impl QuoteSource for NomadGlobalSource {
    fn name(&self) -> &'static str {
        "NomadGlobal"
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_quote(&self) -> Result<Quote, SourceError> {
        let body = fetch_page(&self.client, &self.url).await?;
        self.extract(&body)
    }
}
