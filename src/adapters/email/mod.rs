//! Email adapters - NotificationSender implementations.

mod resend_sender;

pub use resend_sender::{ResendConfig, ResendEmailRequest, ResendEmailSender};
