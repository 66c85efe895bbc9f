pub mod ambito;
pub mod cronista;
pub mod dolar_hoy;

pub use ambito::{AmbitoSource, AMBITO_URL};
pub use cronista::{CronistaSource, CRONISTA_URL};
pub use dolar_hoy::{DolarHoySource, DOLAR_HOY_URL};
