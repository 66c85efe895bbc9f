use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use crate::error::SourceError;
use crate::ledger::models::Quote;
use crate::sources::html::{fetch_page, parse_price, quote_from, selector, text_of};
use crate::sources::traits::QuoteSource;

pub const DOLAR_HOY_URL: &str = "https://www.dolarhoy.com";

/// DolarHoy tags prices with `data-compra` / `data-venta` attributes
pub struct DolarHoySource {
    client: Client,
    url: String,
}

impl DolarHoySource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn extract(&self, body: &str) -> Result<Quote, SourceError> {
        let document = Html::parse_document(body);

        let buy_selector = selector("[data-compra]")?;
        let sell_selector = selector("[data-venta]")?;

        let buy = document
            .select(&buy_selector)
            .next()
            .ok_or(SourceError::MissingMarkup("[data-compra]"))?;
        let sell = document
            .select(&sell_selector)
            .next()
            .ok_or(SourceError::MissingMarkup("[data-venta]"))?;

        quote_from(
            parse_price(&text_of(buy))?,
            parse_price(&text_of(sell))?,
            &self.url,
        )
    }
}

#[async_trait]
impl QuoteSource for DolarHoySource {
    fn name(&self) -> &'static str {
        "DolarHoy"
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
    fn test_reads_first_tagged_values() {
        let source = DolarHoySource::new(Client::new(), DOLAR_HOY_URL);
        let quote = source
            .extract(
                r#"<div data-compra="1">1045</div><div data-venta="1">1085,5</div>
                   <div data-compra="2">9999</div>"#,
            )
            .unwrap();

        assert_eq!(quote.buy_price, dec!(1045));
        assert_eq!(quote.sell_price, dec!(1085.5));
        assert_eq!(quote.source, DOLAR_HOY_URL);
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let source = DolarHoySource::new(Client::new(), DOLAR_HOY_URL);
        let result = source.extract(r#"<div data-compra>0</div><div data-venta>1085</div>"#);
        assert!(matches!(result, Err(SourceError::InvalidPrice(_))));
    }
}
