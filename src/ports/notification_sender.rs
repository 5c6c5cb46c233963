//! Notification port for customer confirmations.
//!
//! Delivery is best effort: callers log failures and carry on.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp};

/// Content of the confirmation sent after a consultation is paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationConfirmation {
    pub to_email: String,
    pub customer_name: String,
    pub consultation_date: Timestamp,
    pub discount_code: String,
    /// Human-readable discount value, e.g. `50.00 EUR`.
    pub discount_amount: String,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
}

/// Port for sending customer notifications.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Sends the consultation confirmation.
    ///
    /// # Errors
    ///
    /// - `NotificationFailed` if the provider rejected or never received it
    async fn send_consultation_confirmation(
        &self,
        confirmation: &ConsultationConfirmation,
    ) -> Result<(), DomainError>;
}
