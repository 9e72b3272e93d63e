//! Configuration management for service clients
//!
//! This module provides utilities for loading and validating configuration
//! for the external service clients, with support for environment variables.

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value.parse::<i64>().map_err(|e| {
            ServiceError::configuration(format!("Invalid integer for key {}: {}", key, e))
        })
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get an integer configuration value with a default
    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }
}

impl<T: ConfigProvider> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,

    /// Optional namespace for variables (e.g., "TICKETING", "COMMERCE")
    namespace: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set a namespace for environment variables
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Format a configuration key as an environment variable
    fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        if let Some(ref namespace) = self.namespace {
            env_key.push_str(namespace);
            env_key.push('_');
        }

        env_key.push_str(
            &key.to_uppercase()
                .replace(|c: char| !c.is_ascii_alphanumeric(), "_"),
        );

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                ServiceError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => ServiceError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    /// Configuration values
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values.get(key).cloned().ok_or_else(|| {
            ServiceError::configuration(format!("Configuration key not found: {}", key))
        })
    }
}

/// Global default configuration provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new().with_prefix("SLAREP")));

/// Trait for service-specific configuration
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

/// Configuration for the ticketing system client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketingConfig {
    /// Bearer token for authentication
    pub api_token: String,

    /// Base URL of the ticketing system
    pub base_url: String,

    /// Project the automation files tickets under
    pub project_key: String,

    /// Issue type used for created tickets
    pub issue_type: String,

    /// Due date offset for created tickets, in days from today
    pub due_in_days: i64,

    /// Timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for TicketingConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: "https://jira.int.zone".to_string(),
            project_key: "TRITS".to_string(),
            issue_type: "3rd-line Ticket".to_string(),
            due_in_days: 30,
            timeout_seconds: 30,
        }
    }
}

impl TicketingConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider + ConfigProviderExt>(provider: &P) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            api_token: provider.get_string_or("ticketing_api_token", ""),
            base_url: provider.get_string_or("ticketing_base_url", &defaults.base_url),
            project_key: provider.get_string_or("ticketing_project_key", &defaults.project_key),
            issue_type: provider.get_string_or("ticketing_issue_type", &defaults.issue_type),
            due_in_days: provider.get_int_or("ticketing_due_in_days", defaults.due_in_days),
            timeout_seconds: provider.get_int_or("ticketing_timeout_seconds", 30) as u64,
        };

        Ok(config)
    }
}

impl ServiceConfig for TicketingConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ServiceError::configuration(
                "Ticketing base URL is required",
            ));
        }

        if self.project_key.is_empty() {
            return Err(ServiceError::configuration(
                "Ticketing project key is required",
            ));
        }

        if self.issue_type.is_empty() {
            return Err(ServiceError::configuration(
                "Ticketing issue type is required",
            ));
        }

        if self.due_in_days < 0 {
            return Err(ServiceError::configuration(
                "Ticketing due date offset must not be negative",
            ));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "ticketing"
    }
}

/// Configuration for the commerce platform client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL of the commerce platform public API
    pub base_url: String,

    /// Timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.connect.cloudblue.com/public/v1".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl CommerceConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider + ConfigProviderExt>(provider: &P) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            api_key: provider.get_string_or("commerce_api_key", ""),
            base_url: provider.get_string_or("commerce_base_url", &defaults.base_url),
            timeout_seconds: provider.get_int_or("commerce_timeout_seconds", 30) as u64,
        };

        Ok(config)
    }
}

impl ServiceConfig for CommerceConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ServiceError::configuration("Commerce base URL is required"));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "commerce"
    }
}
