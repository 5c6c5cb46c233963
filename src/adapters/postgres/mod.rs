//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresDiscountStore` - Consultations and discount codes

mod discount_store;

pub use discount_store::PostgresDiscountStore;
