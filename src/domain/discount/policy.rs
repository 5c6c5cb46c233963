//! Issuing policy for consultation discount codes.

/// Fixed parameters applied when a consultation is paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountPolicy {
    /// Discount value in minor currency units.
    pub amount_cents: i64,
    /// ISO 4217 currency code shown in notifications.
    pub currency: String,
    /// Upper bound on generate/insert attempts for one consultation.
    pub max_generation_attempts: u32,
}

impl DiscountPolicy {
    pub const DEFAULT_AMOUNT_CENTS: i64 = 5000;
    pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 10;

    pub fn new(amount_cents: i64, currency: impl Into<String>, max_generation_attempts: u32) -> Self {
        Self {
            amount_cents,
            currency: currency.into(),
            max_generation_attempts,
        }
    }

    /// Renders an amount like `50.00 EUR`.
    pub fn display_amount(&self) -> String {
        format!(
            "{}.{:02} {}",
            self.amount_cents / 100,
            self.amount_cents % 100,
            self.currency
        )
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_AMOUNT_CENTS,
            "EUR",
            Self::DEFAULT_MAX_GENERATION_ATTEMPTS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_documented_constants() {
        let policy = DiscountPolicy::default();
        assert_eq!(policy.amount_cents, 5000);
        assert_eq!(policy.max_generation_attempts, 10);
        assert_eq!(policy.currency, "EUR");
    }

    #[test]
    fn display_amount_pads_cents() {
        let policy = DiscountPolicy::new(2505, "USD", 3);
        assert_eq!(policy.display_amount(), "25.05 USD");
    }
}
