//! RedeemDiscountCodeHandler - Command handler for marking a code used.
//!
//! Redemption relies on the store's conditional update alone. It does not
//! re-check the validity window; checkout validates before it redeems.

use std::sync::Arc;

use tracing::info;

use crate::domain::discount::{DiscountCode, DiscountError, RedemptionRejection};
use crate::domain::foundation::Timestamp;
use crate::ports::DiscountStore;

/// Command to redeem a discount code against an order.
#[derive(Debug, Clone)]
pub struct RedeemDiscountCodeCommand {
    pub code: String,
    pub order_id: Option<String>,
    pub at: Timestamp,
}

/// Result of redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemDiscountCodeResult {
    Redeemed {
        code: DiscountCode,
        order_id: Option<String>,
    },
    Rejected(RedemptionRejection),
}

/// Handler for redeeming discount codes.
pub struct RedeemDiscountCodeHandler {
    store: Arc<dyn DiscountStore>,
}

impl RedeemDiscountCodeHandler {
    pub fn new(store: Arc<dyn DiscountStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: RedeemDiscountCodeCommand,
    ) -> Result<RedeemDiscountCodeResult, DiscountError> {
        if cmd.code.trim().is_empty() {
            return Err(DiscountError::invalid_input(
                "code",
                "No discount code provided",
            ));
        }

        let code = match DiscountCode::parse(&cmd.code) {
            Ok(code) => code,
            Err(_) => {
                return Ok(RedeemDiscountCodeResult::Rejected(
                    RedemptionRejection::NotFoundOrAlreadyUsed,
                ))
            }
        };

        let order_id = cmd
            .order_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        match self
            .store
            .mark_used_if_unused(&code, order_id.as_deref(), cmd.at)
            .await?
        {
            Some(record) => {
                info!(code = %record.code(), order_id = ?order_id, "Discount code redeemed");
                Ok(RedeemDiscountCodeResult::Redeemed {
                    code: record.code().clone(),
                    order_id,
                })
            }
            None => {
                info!(code = %code, "Redemption refused, code unknown or already used");
                Ok(RedeemDiscountCodeResult::Rejected(
                    RedemptionRejection::NotFoundOrAlreadyUsed,
                ))
            }
        }
    }
}
