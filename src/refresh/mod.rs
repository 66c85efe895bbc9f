// Background refresh of cached quote results
pub mod scheduler;

pub use scheduler::{RefreshConfig, RefreshScheduler};
