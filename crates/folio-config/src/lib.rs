//! # Folio Config
//!
//! Layered configuration for the Folio services: TOML files, `.env`,
//! and `FOLIO__*` environment variables, validated up front.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
