//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DiscountStore` - Consultations and discount codes persistence
//! - `NotificationSender` - Customer confirmation delivery

mod discount_store;
mod notification_sender;

pub use discount_store::DiscountStore;
pub use notification_sender::{ConsultationConfirmation, NotificationSender};
