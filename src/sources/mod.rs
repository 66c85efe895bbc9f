pub mod ars;
pub mod brl;
pub mod html;
pub mod registry;
pub mod traits;

use reqwest::Client;
use std::sync::Arc;

use crate::ledger::models::CurrencyGroup;

pub use registry::SourceRegistry;
pub use traits::QuoteSource;

/// Registry with the production sites, three per currency group
pub fn default_registry(client: Client) -> SourceRegistry {
    let mut registry = SourceRegistry::new();

    registry.register(CurrencyGroup::Ars, Arc::new(ars::AmbitoSource::new(client.clone(), ars::AMBITO_URL)));
    registry.register(CurrencyGroup::Ars, Arc::new(ars::DolarHoySource::new(client.clone(), ars::DOLAR_HOY_URL)));
    registry.register(CurrencyGroup::Ars, Arc::new(ars::CronistaSource::new(client.clone(), ars::CRONISTA_URL)));

    registry.register(CurrencyGroup::Brl, Arc::new(brl::WiseSource::new(client.clone(), brl::WISE_URL)));
    registry.register(CurrencyGroup::Brl, Arc::new(brl::NubankSource::new(client.clone(), brl::NUBANK_URL)));
    registry.register(CurrencyGroup::Brl, Arc::new(brl::NomadGlobalSource::new(client, brl::NOMAD_GLOBAL_URL)));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_layout() {
        let registry = default_registry(Client::new());

        assert_eq!(
            registry.source_names(CurrencyGroup::Ars),
            vec!["Ambito", "DolarHoy", "Cronista"]
        );
        assert_eq!(
            registry.source_names(CurrencyGroup::Brl),
            vec!["Wise", "Nubank", "NomadGlobal"]
        );
    }
}
