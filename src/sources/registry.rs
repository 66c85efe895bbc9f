use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::ledger::models::CurrencyGroup;
use crate::sources::traits::QuoteSource;

/// Ordered quote sources per currency group
pub struct SourceRegistry {
    sources: HashMap<CurrencyGroup, Vec<Arc<dyn QuoteSource>>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Sources of a group are fetched in registration order
    pub fn register(&mut self, group: CurrencyGroup, source: Arc<dyn QuoteSource>) {
        info!("Registering {} source: {}", group, source.name());
        self.sources.entry(group).or_default().push(source);
    }

    pub fn sources_for(&self, group: CurrencyGroup) -> &[Arc<dyn QuoteSource>] {
        self.sources.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn source_names(&self, group: CurrencyGroup) -> Vec<&'static str> {
        self.sources_for(group).iter().map(|s| s.name()).collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
