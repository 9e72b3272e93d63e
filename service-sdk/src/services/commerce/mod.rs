//! Commerce platform client implementation
//!
//! This module provides a client for the commerce platform's public API:
//! request listing with composable filters, and conversation messages
//! (listing and creation). Request records are loosely structured and are
//! returned as raw JSON values; callers use path-based field access.

mod models;
pub use models::*;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::{CommerceConfig, ServiceConfig, DEFAULT_PROVIDER};
use crate::core::{AuthenticatedClient, RequestExecutor, ServiceClient};
use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, parse_error_response, UserAgent};
use crate::util::truncate_string;

/// Commerce platform client
pub struct CommerceClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: CommerceConfig,
}

impl CommerceClient {
    /// Create a new commerce client with the given configuration
    pub fn new(config: CommerceConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_secs(config.timeout_seconds);

        let http_client = build_http_client(
            Some(UserAgent {
                extra: Some("commerce-client".to_string()),
                ..UserAgent::default()
            }),
            Some(timeout),
        )?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create a new builder for the commerce client
    pub fn builder() -> CommerceClientBuilder {
        CommerceClientBuilder::default()
    }

    /// List service requests matching the query
    ///
    /// The platform returns the full filtered, sorted result set; paging
    /// is handled by the platform's listing interface and is not a concern
    /// of this client.
    pub async fn list_requests(&self, query: &RequestQuery) -> Result<Vec<Value>> {
        let query_string = query.to_query_string();
        debug!(
            "Listing requests: {}",
            truncate_string(&query_string, 200)
        );

        let raw_query = if query_string.is_empty() {
            None
        } else {
            Some(query_string.as_str())
        };

        self.get("requests", raw_query).await
    }

    /// List the messages of a request's conversation
    ///
    /// Only actual messages are returned; system events are filtered out
    /// on the platform side.
    pub async fn conversation_messages(&self, request_id: &str) -> Result<Vec<Value>> {
        let endpoint = format!("conversations/{}/messages", request_id);
        self.get(&endpoint, Some("eq(type,message)")).await
    }

    /// Post a message into a request's conversation
    pub async fn post_message(&self, request_id: &str, text: &str) -> Result<Value> {
        let endpoint = format!("conversations/{}/messages", request_id);
        let body = MessageSeed {
            text: text.to_string(),
        };
        self.post(&endpoint, &body).await
    }
}

#[async_trait]
impl ServiceClient for CommerceClient {
    fn name(&self) -> &str {
        "commerce"
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn version(&self) -> &str {
        "v1"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.get::<Vec<Value>>("requests", Some("limit=1")).await {
            Ok(_) => Ok(true),
            Err(e) => {
                log::warn!("Commerce health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl RequestExecutor for CommerceClient {
    async fn get<R>(&self, endpoint: &str, raw_query: Option<&str>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let mut url = Url::parse(&format!("{}/{}", self.config.base_url, endpoint))
            .map_err(|e| ServiceError::validation(format!("Invalid URL: {}", e)))?;

        if let Some(query) = raw_query {
            url.set_query(Some(query));
        }

        debug!("Sending request to commerce platform: GET {}", url);

        let response = self
            .http_client
            .get(url.as_str())
            .header("Authorization", &self.config.api_key)
            .send()
            .await
            .map_err(|e| ServiceError::network(format!("Failed to send request: {}", e)))?;

        if response.status().is_success() {
            response
                .json::<R>()
                .await
                .map_err(|e| ServiceError::parsing(format!("Failed to parse response: {}", e)))
        } else {
            Err(parse_error_response("commerce", response).await)
        }
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        debug!("Sending request to commerce platform: POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::network(format!("Failed to send request: {}", e)))?;

        if response.status().is_success() {
            response
                .json::<R>()
                .await
                .map_err(|e| ServiceError::parsing(format!("Failed to parse response: {}", e)))
        } else {
            Err(parse_error_response("commerce", response).await)
        }
    }

    async fn put<T, R>(&self, _endpoint: &str, _body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        // Request records are immutable snapshots for this automation
        Err(ServiceError::validation(
            "PUT not supported for the commerce client",
        ))
    }

    async fn delete<R>(&self, _endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        Err(ServiceError::validation(
            "DELETE not supported for the commerce client",
        ))
    }
}

#[async_trait]
impl AuthenticatedClient for CommerceClient {
    fn auth_type(&self) -> &str {
        "ApiKey"
    }

    fn set_auth(&mut self, auth: impl Into<String> + Send) -> Result<()> {
        self.config.api_key = auth.into();
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn refresh_auth(&mut self) -> Result<()> {
        // Platform API keys are static credentials
        Ok(())
    }

    fn apply_auth(&self, headers: &mut HashMap<String, String>) -> Result<()> {
        if !self.is_authenticated() {
            return Err(ServiceError::authentication(
                "No API key set for the commerce client",
            ));
        }

        headers.insert("Authorization".to_string(), self.config.api_key.clone());
        Ok(())
    }
}

/// Builder for the commerce client
#[derive(Default)]
pub struct CommerceClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl CommerceClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Build the commerce client
    pub fn build(self) -> Result<CommerceClient> {
        // Environment configuration first, explicit values override
        let mut config = CommerceConfig::from_provider(&**DEFAULT_PROVIDER).unwrap_or_default();

        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }

        CommerceClient::new(config)
    }
}
