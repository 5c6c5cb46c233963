//! Stripe webhook event types.
//!
//! Defines the structures for parsing Stripe webhook payloads.
//! Only fields relevant to our processing are captured.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::consultation::NewConsultation;
use crate::domain::foundation::Timestamp;

use super::webhook_errors::WebhookError;

/// Metadata `type` value marking a consultation checkout.
pub const CONSULTATION_PURPOSE: &str = "consultation";

/// Stripe webhook event (simplified).
///
/// Contains the essential fields needed for webhook processing.
/// Additional fields from Stripe's full event schema are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Returns true if this is a live mode event.
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_str(&self.event_type)
    }

    /// Reads the checkout session carried by a `checkout.session.*` event.
    pub fn checkout_session(&self) -> Result<CheckoutSession, WebhookError> {
        self.deserialize_object()
            .map_err(|e| WebhookError::ParseError(format!("checkout session: {}", e)))
    }
}

/// Known Stripe event types that we handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// Checkout session completed successfully.
    CheckoutSessionCompleted,
    /// Delayed payment (bank debit, voucher) for a completed checkout settled.
    CheckoutSessionAsyncPaymentSucceeded,
    /// Unknown or unhandled event type.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "checkout.session.async_payment_succeeded" => {
                Self::CheckoutSessionAsyncPaymentSucceeded
            }
            _ => Self::Unknown,
        }
    }

    /// True for events whose checkout session may carry a settled payment.
    pub fn confirms_checkout_payment(&self) -> bool {
        matches!(
            self,
            Self::CheckoutSessionCompleted | Self::CheckoutSessionAsyncPaymentSucceeded
        )
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::CheckoutSessionAsyncPaymentSucceeded => {
                "checkout.session.async_payment_succeeded"
            }
            Self::Unknown => "unknown",
        }
    }
}

/// Customer details collected by the hosted checkout page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// The `data.object` of a checkout session event.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutSession {
    /// Checkout session id (cs_xxx).
    pub id: String,

    /// Payment intent id, or the expanded payment intent object.
    #[serde(default)]
    pub payment_intent: Option<serde_json::Value>,

    /// "paid", "unpaid" or "no_payment_required".
    #[serde(default)]
    pub payment_status: Option<String>,

    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl CheckoutSession {
    /// Returns a metadata value, treating blank values as absent.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The checkout purpose declared by the storefront (`metadata.type`).
    pub fn purpose(&self) -> Option<&str> {
        self.metadata_value("type")
    }

    pub fn is_consultation(&self) -> bool {
        self.purpose() == Some(CONSULTATION_PURPOSE)
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }

    /// Payment intent id whether or not the object was expanded.
    pub fn payment_intent_id(&self) -> Option<String> {
        match self.payment_intent.as_ref()? {
            serde_json::Value::String(id) => Some(id.clone()),
            serde_json::Value::Object(obj) => obj.get("id")?.as_str().map(str::to_string),
            _ => None,
        }
    }

    fn details(&self) -> Option<&CustomerDetails> {
        self.customer_details.as_ref()
    }

    /// Extracts the booking from a consultation checkout.
    ///
    /// Metadata wins over `customer_details` for name, email and phone.
    ///
    /// # Errors
    ///
    /// - `MissingMetadata` if the consultation date or customer email is absent
    /// - `InvalidMetadata` if the date is not RFC 3339 or the email is unusable
    pub fn consultation_request(&self) -> Result<NewConsultation, WebhookError> {
        let raw_date = self
            .metadata_value("consultation_date")
            .or_else(|| self.metadata_value("consultationDate"))
            .ok_or(WebhookError::MissingMetadata("consultation_date"))?;
        let consultation_date = Timestamp::parse_rfc3339("consultation_date", raw_date)
            .map_err(|e| WebhookError::InvalidMetadata {
                field: "consultation_date",
                reason: e.to_string(),
            })?;

        let customer_email = self
            .metadata_value("customer_email")
            .map(str::to_string)
            .or_else(|| self.details().and_then(|d| d.email.clone()))
            .or_else(|| self.customer_email.clone())
            .filter(|e| !e.trim().is_empty())
            .ok_or(WebhookError::MissingMetadata("customer_email"))?;

        let customer_name = self
            .metadata_value("customer_name")
            .map(str::to_string)
            .or_else(|| self.details().and_then(|d| d.name.clone()))
            .unwrap_or_default();

        let customer_phone = self
            .metadata_value("customer_phone")
            .map(str::to_string)
            .or_else(|| self.details().and_then(|d| d.phone.clone()));

        let request = NewConsultation {
            customer_name,
            customer_email: customer_email.trim().to_string(),
            customer_phone,
            consultation_date,
            hair_type: self.metadata_value("hair_type").unwrap_or_default().to_string(),
            concerns: self.metadata_value("concerns").unwrap_or_default().to_string(),
            payment_intent_id: self.payment_intent_id(),
            payment_session_id: self.id.clone(),
        };

        request.validate().map_err(|e| WebhookError::InvalidMetadata {
            field: "customer_email",
            reason: e.to_string(),
        })?;

        Ok(request)
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
            },
            livemode: self.livemode,
            api_version: Some("2023-10-16".to_string()),
        }
    }
}

/// A paid consultation checkout session object for tests.
#[cfg(test)]
pub fn consultation_session_json(session_id: &str, consultation_date: &str) -> serde_json::Value {
    serde_json::json!({
        "id": session_id,
        "payment_intent": "pi_test_123",
        "payment_status": "paid",
        "customer_details": {
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+33600000000"
        },
        "metadata": {
            "type": "consultation",
            "consultation_date": consultation_date,
            "hair_type": "curly",
            "concerns": "frizz"
        }
    })
}
