//! Ticketing system client implementation
//!
//! This module provides a bearer-authenticated client for the ticketing
//! system's REST API: credential validation, free-text issue search and
//! issue creation.

mod models;
pub use models::*;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use log::{debug, info};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::{ServiceConfig, TicketingConfig, DEFAULT_PROVIDER};
use crate::core::{AuthenticatedClient, RequestExecutor, ServiceClient};
use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, parse_error_response, UserAgent};
use crate::util::sanitize_for_logging;

/// Endpoint for credential validation
const MYSELF_ENDPOINT: &str = "rest/api/2/myself";

/// Endpoint for issue search
const SEARCH_ENDPOINT: &str = "rest/api/2/search";

/// Endpoint for issue creation
const ISSUE_ENDPOINT: &str = "rest/api/2/issue";

/// Ticketing system client
pub struct TicketingClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: TicketingConfig,
}

impl TicketingClient {
    /// Create a new ticketing client with the given configuration
    pub fn new(config: TicketingConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_secs(config.timeout_seconds);

        let http_client = build_http_client(
            Some(UserAgent {
                extra: Some("ticketing-client".to_string()),
                ..UserAgent::default()
            }),
            Some(timeout),
        )?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create a new builder for the ticketing client
    pub fn builder() -> TicketingClientBuilder {
        TicketingClientBuilder::default()
    }

    /// Validate the configured credential against the ticketing system
    ///
    /// A 401 surfaces as an Authentication error carrying status code 401
    /// in its context, which lets callers distinguish a bad token from
    /// other failures.
    pub async fn myself(&self) -> Result<Value> {
        self.get(MYSELF_ENDPOINT, None).await
    }

    /// Search for an issue whose text contains `needle`
    ///
    /// Returns the first matching issue's key and status, or `None` when
    /// the result set is empty.
    pub async fn search_text(&self, needle: &str) -> Result<Option<TicketRef>> {
        let request = SearchRequest::text_contains(needle);
        debug!("Searching ticketing system: {}", sanitize_for_logging(&request.jql));

        let response: SearchResponse = self.post(SEARCH_ENDPOINT, &request).await?;

        Ok(response.issues.into_iter().next().map(TicketRef::from))
    }

    /// Create a new ticket with the given summary and description
    ///
    /// Project key, issue type and due-date offset come from the client
    /// configuration.
    pub async fn create_issue(&self, summary: &str, description: &str) -> Result<CreatedIssue> {
        let due = (Utc::now() + ChronoDuration::days(self.config.due_in_days))
            .format("%Y-%m-%d")
            .to_string();

        let request = CreateIssueRequest {
            fields: IssueSeed {
                summary: summary.to_string(),
                issuetype: IssueTypeName {
                    name: self.config.issue_type.clone(),
                },
                duedate: due,
                project: ProjectKey {
                    key: self.config.project_key.clone(),
                },
                description: description.to_string(),
            },
        };

        let created: CreatedIssue = self.post(ISSUE_ENDPOINT, &request).await?;
        info!("Issue created successfully: {}", created.key);

        Ok(created)
    }
}

#[async_trait]
impl ServiceClient for TicketingClient {
    fn name(&self) -> &str {
        "ticketing"
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn version(&self) -> &str {
        "2"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.myself().await {
            Ok(_) => Ok(true),
            Err(e) => {
                log::warn!("Ticketing health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl RequestExecutor for TicketingClient {
    async fn get<R>(&self, endpoint: &str, raw_query: Option<&str>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let mut url = format!("{}/{}", self.config.base_url, endpoint);
        if let Some(query) = raw_query {
            url.push('?');
            url.push_str(query);
        }
        debug!("Sending request to ticketing system: GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| ServiceError::network(format!("Failed to send request: {}", e)))?;

        if response.status().is_success() {
            response
                .json::<R>()
                .await
                .map_err(|e| ServiceError::parsing(format!("Failed to parse response: {}", e)))
        } else {
            Err(parse_error_response("ticketing", response).await)
        }
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        debug!("Sending request to ticketing system: POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_token)
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
            Err(parse_error_response("ticketing", response).await)
        }
    }

    async fn put<T, R>(&self, _endpoint: &str, _body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        // The report automation never updates issues in place
        Err(ServiceError::validation(
            "PUT not supported for the ticketing client",
        ))
    }

    async fn delete<R>(&self, _endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        // The report automation never deletes issues
        Err(ServiceError::validation(
            "DELETE not supported for the ticketing client",
        ))
    }
}

#[async_trait]
impl AuthenticatedClient for TicketingClient {
    fn auth_type(&self) -> &str {
        "Bearer"
    }

    fn set_auth(&mut self, auth: impl Into<String> + Send) -> Result<()> {
        self.config.api_token = auth.into();
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        !self.config.api_token.is_empty()
    }

    async fn refresh_auth(&mut self) -> Result<()> {
        // Bearer tokens for the ticketing system are long-lived and cannot
        // be refreshed through the API
        Ok(())
    }

    fn apply_auth(&self, headers: &mut HashMap<String, String>) -> Result<()> {
        if !self.is_authenticated() {
            return Err(ServiceError::authentication(
                "No API token set for the ticketing client",
            ));
        }

        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.config.api_token),
        );
        Ok(())
    }
}

/// Builder for the ticketing client
#[derive(Default)]
pub struct TicketingClientBuilder {
    api_token: Option<String>,
    base_url: Option<String>,
    project_key: Option<String>,
    issue_type: Option<String>,
    due_in_days: Option<i64>,
    timeout_seconds: Option<u64>,
}

impl TicketingClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the project key for created tickets
    pub fn project_key(mut self, key: impl Into<String>) -> Self {
        self.project_key = Some(key.into());
        self
    }

    /// Set the issue type for created tickets
    pub fn issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = Some(issue_type.into());
        self
    }

    /// Set the due-date offset in days for created tickets
    pub fn due_in_days(mut self, days: i64) -> Self {
        self.due_in_days = Some(days);
        self
    }

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Build the ticketing client
    pub fn build(self) -> Result<TicketingClient> {
        // Environment configuration first, explicit values override
        let mut config = TicketingConfig::from_provider(&**DEFAULT_PROVIDER)
            .unwrap_or_default();

        if let Some(api_token) = self.api_token {
            config.api_token = api_token;
        }

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(project_key) = self.project_key {
            config.project_key = project_key;
        }

        if let Some(issue_type) = self.issue_type {
            config.issue_type = issue_type;
        }

        if let Some(due_in_days) = self.due_in_days {
            config.due_in_days = due_in_days;
        }

        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }

        TicketingClient::new(config)
    }
}
