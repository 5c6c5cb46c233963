//! HTTP adapters - REST API implementations.

pub mod discount;

pub use discount::{discount_router, DiscountAppState};
