//! Error taxonomy for the discount-code lifecycle.
//!
//! Rejections that are ordinary business outcomes (unknown code, expired,
//! already used) are not errors; see [`super::ValidationRejection`].

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::payment::WebhookError;

/// Errors surfaced by the discount handlers.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Required input was missing or malformed.
    #[error("{message}")]
    InvalidInput { field: String, message: String },

    /// The webhook signature or its timestamp did not verify.
    #[error("Invalid webhook signature: {0}")]
    InvalidWebhookSignature(String),

    /// The webhook payload could not be interpreted.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Every generated candidate collided with an existing code.
    #[error("Could not generate a unique discount code after {attempts} attempts")]
    CodeCollisionExhausted { attempts: u32 },

    /// The store rejected or failed an operation.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] DomainError),
}

impl DiscountError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        DiscountError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            DiscountError::InvalidInput { .. } => "INVALID_INPUT",
            DiscountError::InvalidWebhookSignature(_) => "INVALID_WEBHOOK_SIGNATURE",
            DiscountError::MalformedEvent(_) => "MALFORMED_EVENT",
            DiscountError::CodeCollisionExhausted { .. } => "CODE_COLLISION_EXHAUSTED",
            DiscountError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Message safe to return to callers. Server-side failures are generic.
    pub fn message(&self) -> String {
        match self {
            DiscountError::InvalidInput { message, .. } => message.clone(),
            DiscountError::InvalidWebhookSignature(_) => "Invalid webhook signature".to_string(),
            DiscountError::MalformedEvent(reason) => format!("Malformed event: {}", reason),
            DiscountError::CodeCollisionExhausted { .. } | DiscountError::Persistence(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Maps the error to an HTTP status.
    ///
    /// 4xx tells the payment processor not to redeliver; 5xx asks it to retry.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DiscountError::InvalidInput { .. }
            | DiscountError::InvalidWebhookSignature(_)
            | DiscountError::MalformedEvent(_) => StatusCode::BAD_REQUEST,
            DiscountError::CodeCollisionExhausted { .. } | DiscountError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True when a later redelivery of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<ValidationError> for DiscountError {
    fn from(err: ValidationError) -> Self {
        DiscountError::invalid_input(err.field().to_string(), err.to_string())
    }
}

impl From<WebhookError> for DiscountError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp => {
                DiscountError::InvalidWebhookSignature(err.to_string())
            }
            other => DiscountError::MalformedEvent(other.to_string()),
        }
    }
}
