//! Tests for configuration providers and service configs

#[cfg(test)]
mod tests {
    use crate::config::{
        CommerceConfig, ConfigProvider, ConfigProviderExt, EnvConfigProvider,
        MemoryConfigProvider, ServiceConfig, TicketingConfig,
    };

    #[test]
    fn test_memory_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("ticketing_base_url", "https://tickets.example.com");
        provider.set("ticketing_timeout_seconds", 5);

        assert_eq!(
            provider.get_string("ticketing_base_url").unwrap(),
            "https://tickets.example.com"
        );
        assert_eq!(provider.get_int("ticketing_timeout_seconds").unwrap(), 5);
        assert!(provider.get_string("missing_key").is_err());
        assert_eq!(provider.get_int_or("missing_key", 42), 42);
        assert_eq!(provider.get_string_or("missing_key", "fallback"), "fallback");
    }

    #[test]
    fn test_invalid_int_value() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("ticketing_timeout_seconds", "not-a-number");

        assert!(provider.get_int("ticketing_timeout_seconds").is_err());
    }

    #[test]
    fn test_env_provider_key_formatting() {
        std::env::set_var("SLAREP_TEST_TICKETING_BASE_URL", "https://env.example.com");

        let provider = EnvConfigProvider::new()
            .with_prefix("SLAREP")
            .with_namespace("TEST");

        assert_eq!(
            provider.get_string("ticketing_base_url").unwrap(),
            "https://env.example.com"
        );
        assert!(provider.get_string("ticketing_api_token").is_err());

        std::env::remove_var("SLAREP_TEST_TICKETING_BASE_URL");
    }

    #[test]
    fn test_ticketing_config_from_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("ticketing_api_token", "secret");
        provider.set("ticketing_base_url", "https://tickets.example.com");
        provider.set("ticketing_due_in_days", 14);

        let config = TicketingConfig::from_provider(&provider).unwrap();
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.base_url, "https://tickets.example.com");
        assert_eq!(config.due_in_days, 14);
        // Defaults fill the unset keys
        assert_eq!(config.project_key, "TRITS");
        assert_eq!(config.issue_type, "3rd-line Ticket");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ticketing_config_validation() {
        let config = TicketingConfig {
            project_key: String::new(),
            ..TicketingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TicketingConfig {
            due_in_days: -1,
            ..TicketingConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(TicketingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_commerce_config_validation() {
        let config = CommerceConfig {
            base_url: String::new(),
            ..CommerceConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.service_name(), "commerce");

        assert!(CommerceConfig::default().validate().is_ok());
    }
}
