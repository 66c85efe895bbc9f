//! Shared plumbing for the HTML scrapers: HTTP client, page fetch and
//! price parsing.

use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;
use std::time::Duration;

use crate::error::SourceError;
use crate::ledger::models::Quote;

pub const USER_AGENT: &str = "Mozilla/5.0";

/// Client shared by every source: fixed timeout and identifying header
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// GET a page and return its body. Non-2xx responses are errors.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, SourceError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    Ok(response.text().await?)
}

pub fn selector(css: &'static str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|_| SourceError::InvalidSelector(css))
}

pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// First element matching `css` whose text contains `needle`
pub fn first_containing<'a>(
    document: &'a Html,
    css: &'static str,
    needle: &str,
) -> Result<Option<ElementRef<'a>>, SourceError> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .find(|element| text_of(*element).contains(needle)))
}

/// Next sibling that is an element, skipping text and comment nodes
pub fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Closest ancestor element with the given tag name
pub fn closest<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == tag)
}

/// Parses a scraped price the way the sites format them.
///
/// Leading `$` and whitespace are skipped, the first `,` is read as the
/// decimal separator and only the leading numeric prefix is kept, so
/// `"1050,25 ARS"` parses as `1050.25`. The result must be positive.
pub fn parse_price(raw: &str) -> Result<Decimal, SourceError> {
    let normalized = raw
        .trim()
        .trim_start_matches('$')
        .trim_start()
        .replacen(',', ".", 1);

    let mut seen_dot = false;
    let end = normalized
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map(|(i, _)| i)
        .unwrap_or(normalized.len());

    let numeric = normalized[..end].trim_end_matches('.');
    let price = Decimal::from_str(numeric)
        .map_err(|_| SourceError::InvalidPrice(raw.trim().to_string()))?;

    if price <= Decimal::ZERO {
        return Err(SourceError::InvalidPrice(raw.trim().to_string()));
    }

    Ok(price)
}

pub fn quote_from(buy_price: Decimal, sell_price: Decimal, source: &str) -> Result<Quote, SourceError> {
    Quote::new(buy_price, sell_price, source)
        .ok_or_else(|| SourceError::InvalidPrice(format!("{}/{}", buy_price, sell_price)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_price_formats() {
        assert_eq!(parse_price("1050,25").unwrap(), dec!(1050.25));
        assert_eq!(parse_price("  $ 980.5 ").unwrap(), dec!(980.5));
        assert_eq!(parse_price("5,4321 BRL").unwrap(), dec!(5.4321));
        assert_eq!(parse_price("1000").unwrap(), dec!(1000));
    }

    #[test]
    fn test_parse_price_keeps_leading_number_only() {
        // Thousands separators are not understood, only the first number counts
        assert_eq!(parse_price("1.234,56").unwrap(), dec!(1.234));
    }

    #[test]
    fn test_parse_price_rejects_garbage_and_non_positive() {
        assert!(parse_price("").is_err());
        assert!(parse_price("N/A").is_err());
        assert!(parse_price("0,00").is_err());
        assert!(parse_price("-5").is_err());
    }

    #[test]
    fn test_dom_helpers() {
        let document = Html::parse_document(
            "<div id='box'><p>Dólar</p><span>Compra</span> <span>100</span></div>",
        );

        let label = first_containing(&document, "span", "Compra").unwrap().unwrap();
        let value = next_element(label).unwrap();
        assert_eq!(text_of(value), "100");

        let container = closest(value, "div").unwrap();
        assert_eq!(container.value().id(), Some("box"));
    }
}
