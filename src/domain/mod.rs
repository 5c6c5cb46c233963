//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `consultation` - Paid consultation bookings
//! - `discount` - Discount codes, their validity window and single use
//! - `payment` - Stripe webhook verification and checkout session reading

pub mod consultation;
pub mod discount;
pub mod foundation;
pub mod payment;
