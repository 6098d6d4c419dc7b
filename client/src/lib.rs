//! HTTP adapters for the board generation and hint services.

pub use config::*;
pub use error::*;
pub use http::*;

mod config;
mod error;
mod http;
