use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::ledger::models::{CurrencyGroup, GroupQuotes, Quote};
use crate::ledger::repository::QuoteRecorder;
use crate::sources::SourceRegistry;

/// Runs the registered sources and records every quote they return.
///
/// Sources within a group are fetched one after another to keep load on
/// the upstream sites bounded; the two groups run concurrently.
pub struct QuoteAggregator {
    registry: SourceRegistry,
    recorder: Arc<dyn QuoteRecorder>,
}

impl QuoteAggregator {
    pub fn new(registry: SourceRegistry, recorder: Arc<dyn QuoteRecorder>) -> Self {
        Self { registry, recorder }
    }

    /// Fetch every source of `group` sequentially.
    ///
    /// An empty result means no source answered. History writes run in the
    /// background; their latency and failures do not affect the returned quotes.
    pub async fn fetch_group_quotes(&self, group: CurrencyGroup) -> Vec<Quote> {
        let mut quotes = Vec::new();

        for source in self.registry.sources_for(group) {
            let Some(quote) = source.fetch().await else {
                continue;
            };

            self.record_detached(group, source.name(), quote.clone());
            quotes.push(quote);
        }

        if quotes.is_empty() {
            warn!("⚠️  No {} source returned a quote", group);
        } else {
            info!(
                "✓ Fetched {}/{} {} quotes",
                quotes.len(),
                self.registry.sources_for(group).len(),
                group
            );
        }

        quotes
    }

    /// Write a quote to history without holding up the fetch loop
    fn record_detached(&self, group: CurrencyGroup, source: &'static str, quote: Quote) {
        let recorder = Arc::clone(&self.recorder);
        tokio::spawn(async move {
            if let Err(e) = recorder.record_quote(group, &quote).await {
                error!("❌ Failed to record {} quote from {}: {:?}", group, source, e);
            }
        });
    }

    /// Fetch both groups concurrently.
    ///
    /// Each group runs in its own task; a group whose task fails comes back
    /// empty without discarding the other group's quotes.
    pub async fn fetch_all_quotes(self: &Arc<Self>) -> GroupQuotes {
        let ars = tokio::spawn({
            let aggregator = Arc::clone(self);
            async move { aggregator.fetch_group_quotes(CurrencyGroup::Ars).await }
        });
        let brl = tokio::spawn({
            let aggregator = Arc::clone(self);
            async move { aggregator.fetch_group_quotes(CurrencyGroup::Brl).await }
        });

        let (ars, brl) = tokio::join!(ars, brl);

        GroupQuotes {
            ars: Self::settle(CurrencyGroup::Ars, ars),
            brl: Self::settle(CurrencyGroup::Brl, brl),
        }
    }

    fn settle(group: CurrencyGroup, result: Result<Vec<Quote>, JoinError>) -> Vec<Quote> {
        result.unwrap_or_else(|e| {
            error!("❌ {} quote fetch aborted: {:?}", group, e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote_engine::testing::{registry, Concurrency, MemoryRecorder, PanickingSource, StaticSource};
    use crate::sources::QuoteSource;
    use rust_decimal_macros::dec;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    #[tokio::test]
    async fn test_group_collects_successes_in_order() {
        let recorder = Arc::new(MemoryRecorder::default());
        let aggregator = QuoteAggregator::new(
            registry(
                vec![
                    Arc::new(StaticSource::ok("a", dec!(100), dec!(102))),
                    Arc::new(StaticSource::failing("b")),
                    Arc::new(StaticSource::ok("c", dec!(101), dec!(103))),
                ],
                vec![],
            ),
            recorder.clone(),
        );

        let quotes = aggregator.fetch_group_quotes(CurrencyGroup::Ars).await;

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].source, "https://a.test");
        assert_eq!(quotes[1].source, "https://c.test");
        recorder.wait_for(2).await;
        assert_eq!(recorder.count(), 2);
        assert!(aggregator.fetch_group_quotes(CurrencyGroup::Brl).await.is_empty());
    }

    #[tokio::test]
    async fn test_sources_run_one_at_a_time() {
        let concurrency = Arc::new(Concurrency::default());
        let sources: Vec<Arc<dyn QuoteSource>> = (0..3)
            .map(|_| {
                Arc::new(
                    StaticSource::ok("slow", dec!(1), dec!(1))
                        .with_delay(Duration::from_millis(20))
                        .with_concurrency(concurrency.clone()),
                ) as Arc<dyn QuoteSource>
            })
            .collect();

        let aggregator = QuoteAggregator::new(registry(sources, vec![]), Arc::new(MemoryRecorder::default()));
        let quotes = aggregator.fetch_group_quotes(CurrencyGroup::Ars).await;

        assert_eq!(quotes.len(), 3);
        assert_eq!(concurrency.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recorder_failure_keeps_quotes() {
        let aggregator = QuoteAggregator::new(
            registry(vec![Arc::new(StaticSource::ok("a", dec!(100), dec!(102)))], vec![]),
            Arc::new(MemoryRecorder::failing()),
        );

        let quotes = aggregator.fetch_group_quotes(CurrencyGroup::Ars).await;
        assert_eq!(quotes.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_history_store_does_not_delay_quotes() {
        let recorder = Arc::new(MemoryRecorder::with_delay(Duration::from_secs(30)));
        let aggregator = QuoteAggregator::new(
            registry(
                vec![
                    Arc::new(StaticSource::ok("a", dec!(100), dec!(102))),
                    Arc::new(StaticSource::ok("b", dec!(101), dec!(103))),
                    Arc::new(StaticSource::ok("c", dec!(102), dec!(104))),
                ],
                vec![],
            ),
            recorder.clone(),
        );

        let started = tokio::time::Instant::now();
        let quotes = aggregator.fetch_group_quotes(CurrencyGroup::Ars).await;

        assert_eq!(quotes.len(), 3);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(recorder.count(), 0);

        // Writes still land once the store answers
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(recorder.count(), 3);
    }

    #[tokio::test]
    async fn test_failed_group_does_not_discard_other() {
        let aggregator = Arc::new(QuoteAggregator::new(
            registry(
                vec![Arc::new(StaticSource::ok("a", dec!(100), dec!(102)))],
                vec![
                    Arc::new(StaticSource::ok("w", dec!(5.4), dec!(5.4))),
                    Arc::new(PanickingSource),
                ],
            ),
            Arc::new(MemoryRecorder::default()),
        ));

        let all = aggregator.fetch_all_quotes().await;

        assert_eq!(all.ars.len(), 1);
        assert!(all.brl.is_empty());
    }

    #[tokio::test]
    async fn test_groups_run_concurrently() {
        let shared = Arc::new(Concurrency::default());
        let slow = |name| {
            Arc::new(
                StaticSource::ok(name, dec!(1), dec!(1))
                    .with_delay(Duration::from_millis(100))
                    .with_concurrency(shared.clone()),
            ) as Arc<dyn QuoteSource>
        };

        let aggregator = Arc::new(QuoteAggregator::new(
            registry(vec![slow("a")], vec![slow("b")]),
            Arc::new(MemoryRecorder::default()),
        ));

        let all = aggregator.fetch_all_quotes().await;

        assert_eq!(all.ars.len(), 1);
        assert_eq!(all.brl.len(), 1);
        assert_eq!(shared.peak.load(Ordering::SeqCst), 2);
    }
}
