//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - DiscountStore backed by PostgreSQL
//! - `storage` - In-memory DiscountStore
//! - `email` - NotificationSender via Resend
//! - `http` - Axum routes

pub mod email;
pub mod http;
pub mod postgres;
pub mod storage;

pub use email::{ResendConfig, ResendEmailSender};
pub use http::{discount_router, DiscountAppState};
pub use postgres::PostgresDiscountStore;
pub use storage::InMemoryDiscountStore;
