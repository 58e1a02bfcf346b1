// Core records module - moderation warnings and per-server configuration.
// Following the same pattern as the other core modules: models, ports, service.

pub mod records_models;
pub mod records_service;
pub mod records_store;

pub use records_models::*;
pub use records_service::*;
pub use records_store::*;
