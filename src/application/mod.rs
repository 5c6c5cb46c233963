//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::discount::{
    ProcessPaymentWebhookCommand, ProcessPaymentWebhookHandler, ProcessPaymentWebhookResult,
    RedeemDiscountCodeCommand, RedeemDiscountCodeHandler, RedeemDiscountCodeResult,
    ValidateDiscountCodeHandler, ValidateDiscountCodeQuery, ValidateDiscountCodeResult,
};
