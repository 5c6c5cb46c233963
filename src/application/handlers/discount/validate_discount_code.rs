//! ValidateDiscountCodeHandler - Query handler for checkout-time code checks.
//!
//! Read-only: validating a code never changes it, so repeated validation at
//! the same instant always yields the same answer.

use std::sync::Arc;

use tracing::debug;

use crate::domain::discount::{DiscountCode, DiscountError, ValidationRejection};
use crate::domain::foundation::Timestamp;
use crate::ports::DiscountStore;

/// Query to validate a discount code.
#[derive(Debug, Clone)]
pub struct ValidateDiscountCodeQuery {
    /// Code as typed by the customer.
    pub code: String,
    /// Instant to evaluate the validity window at.
    pub at: Timestamp,
}

/// Result of validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateDiscountCodeResult {
    Valid {
        code: DiscountCode,
        amount_cents: i64,
        expires_at: Timestamp,
    },
    Rejected(ValidationRejection),
}

/// Handler for validating discount codes.
pub struct ValidateDiscountCodeHandler {
    store: Arc<dyn DiscountStore>,
}

impl ValidateDiscountCodeHandler {
    pub fn new(store: Arc<dyn DiscountStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ValidateDiscountCodeQuery,
    ) -> Result<ValidateDiscountCodeResult, DiscountError> {
        if query.code.trim().is_empty() {
            return Err(DiscountError::invalid_input(
                "code",
                "No discount code provided",
            ));
        }

        // Anything that cannot be an issued code is simply unknown.
        let code = match DiscountCode::parse(&query.code) {
            Ok(code) => code,
            Err(e) => {
                debug!(error = %e, "Validation input is not a code");
                return Ok(ValidateDiscountCodeResult::Rejected(
                    ValidationRejection::UnknownCode,
                ));
            }
        };

        let record = match self.store.find_by_code(&code).await? {
            Some(record) => record,
            None => {
                return Ok(ValidateDiscountCodeResult::Rejected(
                    ValidationRejection::UnknownCode,
                ))
            }
        };

        let result = match ValidationRejection::from_redeemability(record.redeemability(&query.at))
        {
            Some(rejection) => ValidateDiscountCodeResult::Rejected(rejection),
            None => ValidateDiscountCodeResult::Valid {
                code: record.code().clone(),
                amount_cents: record.amount_cents(),
                expires_at: record.expires_at(),
            },
        };

        debug!(code = %code, result = ?result, "Discount code validated");
        Ok(result)
    }
}
