pub mod aggregator;
pub mod result_cache;
pub mod service;
pub mod statistics;

#[cfg(test)]
pub mod testing;

pub use aggregator::QuoteAggregator;
pub use result_cache::ResultCache;
pub use service::QuoteService;
