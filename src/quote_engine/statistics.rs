use rust_decimal::{Decimal, RoundingStrategy};

use crate::ledger::models::{Average, CurrencyGroup, Quote, Slippage};

/// Decimal places kept for average prices
pub const PRICE_DP: u32 = 2;
/// Decimal places kept for slippage ratios
pub const SLIPPAGE_DP: u32 = 4;

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Mean buy and sell price across `quotes`, tagged with `currency`.
///
/// Returns `None` for an empty set or when the totals overflow. Means are
/// rounded to two decimals, half away from zero.
pub fn calculate_average(quotes: &[Quote], currency: CurrencyGroup) -> Option<Average> {
    if quotes.is_empty() {
        return None;
    }

    let count = Decimal::from(quotes.len());
    let buy_total = checked_total(quotes.iter().map(|q| q.buy_price))?;
    let sell_total = checked_total(quotes.iter().map(|q| q.sell_price))?;

    Some(Average {
        average_buy_price: round(buy_total.checked_div(count)?, PRICE_DP),
        average_sell_price: round(sell_total.checked_div(count)?, PRICE_DP),
        currency,
    })
}

/// `None` when the sum leaves the decimal range
fn checked_total(mut prices: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    prices.try_fold(Decimal::ZERO, |total, price| total.checked_add(price))
}

/// Relative deviation of each quote from `average`, in input order.
///
/// `(price - average) / average`, rounded to four decimals. Returns `None`
/// when either average is zero.
pub fn calculate_slippage(quotes: &[Quote], average: &Average) -> Option<Vec<Slippage>> {
    quotes
        .iter()
        .map(|quote| {
            let buy = (quote.buy_price - average.average_buy_price)
                .checked_div(average.average_buy_price)?;
            let sell = (quote.sell_price - average.average_sell_price)
                .checked_div(average.average_sell_price)?;

            Some(Slippage {
                buy_price_slippage: round(buy, SLIPPAGE_DP),
                sell_price_slippage: round(sell, SLIPPAGE_DP),
                source: quote.source.clone(),
            })
        })
        .collect()
}
