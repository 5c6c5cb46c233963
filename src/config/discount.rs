//! Discount issuing configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::discount::DiscountPolicy;

/// Discount configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountConfig {
    /// Discount value in minor currency units
    #[serde(default = "default_amount_cents")]
    pub amount_cents: i64,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Cap on code generation attempts per consultation
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
}

impl DiscountConfig {
    /// Build the issuing policy handed to the webhook processor.
    pub fn to_policy(&self) -> DiscountPolicy {
        DiscountPolicy::new(
            self.amount_cents,
            self.currency.to_uppercase(),
            self.max_generation_attempts,
        )
    }

    /// Validate discount configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_cents <= 0 {
            return Err(ValidationError::InvalidDiscountAmount);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if !(1..=100).contains(&self.max_generation_attempts) {
            return Err(ValidationError::InvalidGenerationAttempts);
        }
        Ok(())
    }
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            amount_cents: default_amount_cents(),
            currency: default_currency(),
            max_generation_attempts: default_max_generation_attempts(),
        }
    }
}

fn default_amount_cents() -> i64 {
    DiscountPolicy::DEFAULT_AMOUNT_CENTS
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_max_generation_attempts() -> u32 {
    DiscountPolicy::DEFAULT_MAX_GENERATION_ATTEMPTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_defaults() {
        let config = DiscountConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_policy(), DiscountPolicy::default());
    }

    #[test]
    fn test_currency_is_normalized() {
        let config = DiscountConfig {
            currency: "usd".to_string(),
            ..Default::default()
        };
        assert_eq!(config.to_policy().currency, "USD");
    }

    #[test]
    fn test_validation_non_positive_amount() {
        let config = DiscountConfig {
            amount_cents: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDiscountAmount));
    }

    #[test]
    fn test_validation_bad_currency() {
        let config = DiscountConfig {
            currency: "EURO".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCurrency));
    }

    #[test]
    fn test_validation_attempt_bounds() {
        for attempts in [0, 101] {
            let config = DiscountConfig {
                max_generation_attempts: attempts,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ValidationError::InvalidGenerationAttempts)
            );
        }
    }
}
