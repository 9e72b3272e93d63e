//! Core abstractions for the Service SDK
//!
//! This module provides the fundamental trait interfaces that the service
//! clients implement:
//!
//! - `ServiceClient`: The base trait for all service clients
//! - `RequestExecutor`: Handles actual HTTP requests
//! - `AuthenticatedClient`: Adds authentication capabilities

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Base trait for all service clients
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// The client name/identifier
    fn name(&self) -> &str;

    /// The base URL for the service
    fn base_url(&self) -> &str;

    /// Service API version
    fn version(&self) -> &str;

    /// Health check for the service
    async fn health_check(&self) -> Result<bool>;
}

/// Trait responsible for executing HTTP requests with strong typing
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute a GET request
    async fn get<R>(&self, endpoint: &str, raw_query: Option<&str>) -> Result<R>
    where
        R: DeserializeOwned + Send;

    /// Execute a POST request
    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send;

    /// Execute a PUT request
    async fn put<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send;

    /// Execute a DELETE request
    async fn delete<R>(&self, endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned + Send;
}

/// Trait for clients that require authentication
#[async_trait]
pub trait AuthenticatedClient: Send + Sync {
    /// Authentication type (e.g., "Bearer", "ApiKey")
    fn auth_type(&self) -> &str;

    /// Set authentication credentials
    fn set_auth(&mut self, auth: impl Into<String> + Send) -> Result<()>;

    /// Check if client is authenticated
    fn is_authenticated(&self) -> bool;

    /// Refresh authentication credentials if needed
    async fn refresh_auth(&mut self) -> Result<()>;

    /// Add authentication headers to a request
    fn apply_auth(&self, headers: &mut HashMap<String, String>) -> Result<()>;
}
