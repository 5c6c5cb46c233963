//! Webhook error types for Stripe webhook handling.
//!
//! Covers signature verification and payload interpretation. Anything that
//! goes wrong after the event is understood is a `DiscountError` instead.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while verifying and reading a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required metadata field missing from a consultation checkout.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Metadata field present but unusable.
    #[error("Invalid metadata '{field}': {reason}")]
    InvalidMetadata { field: &'static str, reason: String },

    /// Event was intentionally ignored (not an error condition).
    #[error("Event ignored: {0}")]
    Ignored(String),
}

impl WebhookError {
    /// Maps the error to an HTTP status code.
    ///
    /// Nothing here is transient, so nothing asks Stripe for a redelivery.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::MissingMetadata(_)
            | WebhookError::InvalidMetadata { .. } => StatusCode::BAD_REQUEST,

            // Ignored events are acknowledged as success
            WebhookError::Ignored(_) => StatusCode::OK,
        }
    }

    /// True for failures of the signature check itself.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
                | WebhookError::InvalidTimestamp
        )
    }
}
