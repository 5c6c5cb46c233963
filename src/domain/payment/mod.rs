//! Payment module - Stripe webhook verification and event reading.

mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use stripe_event::{
    CheckoutSession, CustomerDetails, StripeEvent, StripeEventData, StripeEventType,
    CONSULTATION_PURPOSE,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub(crate) use stripe_event::{consultation_session_json, StripeEventBuilder};
