//! Endpoint routing shared by the HTTP handler, the CLI and the local fallback

mod endpoint;
mod service;

pub use endpoint::Endpoint;
pub use service::{error_body, status_code, CalculatorService};
