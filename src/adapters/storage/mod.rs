//! In-process storage adapters.
//!
//! - `InMemoryDiscountStore` - DiscountStore for tests and local development

mod in_memory_discount_store;

pub use in_memory_discount_store::InMemoryDiscountStore;
