pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::with_security_headers;
