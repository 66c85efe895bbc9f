pub mod nomad_global;
pub mod nubank;
pub mod wise;

pub use nomad_global::{NomadGlobalSource, NOMAD_GLOBAL_URL};
pub use nubank::{NubankSource, NUBANK_URL};
pub use wise::{WiseSource, WISE_URL};
