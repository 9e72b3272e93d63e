//! # Service SDK
//!
//! A unified SDK for the external services the SLA reporting tools talk to.
//!
//! This crate provides:
//!
//! - Core abstractions for service clients with a unified interface
//! - A typed client for the ticketing system (issue search, issue creation,
//!   credential validation)
//! - A client for the commerce platform (request listing with composable
//!   filters, conversation messages)
//! - A normalized error handling system
//! - Configuration management utilities
//!
//! ## Architecture
//!
//! The SDK is designed around the following key abstractions:
//!
//! - `ServiceClient`: The base trait for all external service clients
//! - `RequestExecutor`: Handles the actual HTTP requests
//! - `AuthenticatedClient`: Adds authentication capabilities to clients
//! - `ServiceError`: Normalized error handling system

// Re-export core modules
pub mod core;
pub use crate::core::{AuthenticatedClient, RequestExecutor, ServiceClient};

// Re-export service-specific modules
pub mod services;
pub use services::{commerce, ticketing};

// Re-export error handling
pub mod error;
pub use error::{ErrorContext, Result, ServiceError};

// Re-export configuration management
pub mod config;
pub use config::{CommerceConfig, ConfigProvider, ServiceConfig, TicketingConfig};

// Utility module for common functionality
mod util;

#[cfg(test)]
mod tests;

/// Create a ticketing client configured from the default (environment)
/// configuration provider.
pub fn ticketing_client() -> Result<ticketing::TicketingClient> {
    let config = TicketingConfig::from_provider(&**config::DEFAULT_PROVIDER)?;
    ticketing::TicketingClient::new(config)
}

/// Create a commerce-platform client configured from the default
/// (environment) configuration provider.
pub fn commerce_client() -> Result<commerce::CommerceClient> {
    let config = CommerceConfig::from_provider(&**config::DEFAULT_PROVIDER)?;
    commerce::CommerceClient::new(config)
}
