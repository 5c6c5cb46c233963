//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CONSULTATION_DISCOUNTS` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use consultation_discounts::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod database;
mod discount;
mod email;
mod error;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use discount::DiscountConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment configuration (Stripe webhooks)
    pub payment: PaymentConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,

    /// Discount issuing configuration
    #[serde(default)]
    pub discount: DiscountConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CONSULTATION_DISCOUNTS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CONSULTATION_DISCOUNTS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CONSULTATION_DISCOUNTS__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONSULTATION_DISCOUNTS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.email.validate()?;
        self.discount.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CONSULTATION_DISCOUNTS__DATABASE__URL",
        "CONSULTATION_DISCOUNTS__PAYMENT__STRIPE_WEBHOOK_SECRET",
        "CONSULTATION_DISCOUNTS__PAYMENT__REQUIRE_LIVEMODE",
        "CONSULTATION_DISCOUNTS__EMAIL__RESEND_API_KEY",
        "CONSULTATION_DISCOUNTS__SERVER__PORT",
        "CONSULTATION_DISCOUNTS__SERVER__ENVIRONMENT",
        "CONSULTATION_DISCOUNTS__SERVER__LOG_FORMAT",
        "CONSULTATION_DISCOUNTS__DISCOUNT__AMOUNT_CENTS",
    ];

    fn set_minimal_env() {
        env::set_var(
            "CONSULTATION_DISCOUNTS__DATABASE__URL",
            "postgresql://test@localhost/discounts",
        );
        env::set_var(
            "CONSULTATION_DISCOUNTS__PAYMENT__STRIPE_WEBHOOK_SECRET",
            "whsec_xxx",
        );
        env::set_var("CONSULTATION_DISCOUNTS__EMAIL__RESEND_API_KEY", "re_xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let result = load_with(&[]);

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/discounts");
        assert_eq!(config.payment.stripe_webhook_secret.expose_secret(), "whsec_xxx");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_section_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.database.query_timeout_secs, 5);
        assert!(!config.payment.require_livemode);
        assert_eq!(config.discount.amount_cents, 5000);
        assert_eq!(config.discount.max_generation_attempts, 10);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("CONSULTATION_DISCOUNTS__SERVER__PORT", "3000"),
            ("CONSULTATION_DISCOUNTS__SERVER__ENVIRONMENT", "production"),
            ("CONSULTATION_DISCOUNTS__SERVER__LOG_FORMAT", "json"),
            ("CONSULTATION_DISCOUNTS__PAYMENT__REQUIRE_LIVEMODE", "true"),
            ("CONSULTATION_DISCOUNTS__DISCOUNT__AMOUNT_CENTS", "2500"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert!(config.payment.require_livemode);
        assert_eq!(config.discount.amount_cents, 2500);
    }

    #[test]
    fn test_missing_database_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var(
            "CONSULTATION_DISCOUNTS__PAYMENT__STRIPE_WEBHOOK_SECRET",
            "whsec_xxx",
        );
        env::set_var("CONSULTATION_DISCOUNTS__EMAIL__RESEND_API_KEY", "re_xxx");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
