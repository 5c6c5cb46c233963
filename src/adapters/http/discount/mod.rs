//! HTTP adapter for discount endpoints.
//!
//! - `POST /api/webhooks/stripe` - Issue a code for a paid consultation
//! - `POST /api/discount-codes/validate` - Validate a code at checkout
//! - `POST /api/discount-codes/redeem` - Redeem a code against an order
//! - `GET /health` - Liveness check

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{DiscountApiError, DiscountAppState, STRIPE_SIGNATURE_HEADER};
pub use routes::{discount_code_routes, discount_router, webhook_routes};
