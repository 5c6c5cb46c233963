//! Discount handlers.
//!
//! ## Commands
//! - Processing consultation payment webhooks (issues codes)
//! - Redeeming a code against an order
//!
//! ## Queries
//! - Validating a code at checkout

mod process_payment_webhook;
mod redeem_discount_code;
mod validate_discount_code;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use process_payment_webhook::{
    ProcessPaymentWebhookCommand, ProcessPaymentWebhookHandler, ProcessPaymentWebhookResult,
};
pub use redeem_discount_code::{
    RedeemDiscountCodeCommand, RedeemDiscountCodeHandler, RedeemDiscountCodeResult,
};

// Queries
pub use validate_discount_code::{
    ValidateDiscountCodeHandler, ValidateDiscountCodeQuery, ValidateDiscountCodeResult,
};
