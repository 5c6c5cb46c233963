//! Resend email adapter.
//!
//! Sends the consultation confirmation through the Resend HTTP API.
//! See <https://resend.com/docs/api-reference/emails/send-email>.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{ConsultationConfirmation, NotificationSender};

/// Configuration for the Resend sender.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    /// `Name <address>` sender header.
    pub from: String,
    /// Base URL for the API (default: https://api.resend.com).
    pub base_url: String,
    pub timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: SecretString, from: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Request body for `POST /emails`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResendEmailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

/// Resend implementation of the NotificationSender port.
pub struct ResendEmailSender {
    config: ResendConfig,
    client: Client,
}

impl ResendEmailSender {
    pub fn new(config: ResendConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { config, client })
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.base_url.trim_end_matches('/'))
    }

    /// Builds the message for a confirmation.
    pub fn build_request(&self, confirmation: &ConsultationConfirmation) -> ResendEmailRequest {
        let greeting = if confirmation.customer_name.trim().is_empty() {
            "Hello,".to_string()
        } else {
            format!("Hello {},", confirmation.customer_name.trim())
        };

        let text = format!(
            "{greeting}\n\n\
             Thank you for booking a hair consultation. Your appointment is confirmed for {date}.\n\n\
             As a thank-you, here is a single-use discount code worth {amount}:\n\n    {code}\n\n\
             The code can be used from {from} until {until}.\n",
            greeting = greeting,
            date = confirmation.consultation_date.as_datetime().format("%Y-%m-%d %H:%M UTC"),
            amount = confirmation.discount_amount,
            code = confirmation.discount_code,
            from = confirmation.valid_from.as_datetime().format("%Y-%m-%d %H:%M UTC"),
            until = confirmation.valid_until.as_datetime().format("%Y-%m-%d %H:%M UTC"),
        );

        ResendEmailRequest {
            from: self.config.from.clone(),
            to: vec![confirmation.to_email.clone()],
            subject: "Your consultation is confirmed".to_string(),
            text,
        }
    }
}

#[async_trait]
impl NotificationSender for ResendEmailSender {
    async fn send_consultation_confirmation(
        &self,
        confirmation: &ConsultationConfirmation,
    ) -> Result<(), DomainError> {
        let body = self.build_request(confirmation);

        let response = self
            .client
            .post(self.emails_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() { "timed out" } else { "request failed" };
                DomainError::new(
                    ErrorCode::NotificationFailed,
                    format!("Resend {}: {}", reason, e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                format!("Resend rejected message with status {}", status),
            )
            .with_detail("response", detail));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn at(value: &str) -> Timestamp {
        Timestamp::parse_rfc3339("at", value).unwrap()
    }

    fn confirmation(name: &str) -> ConsultationConfirmation {
        ConsultationConfirmation {
            to_email: "ada@example.com".to_string(),
            customer_name: name.to_string(),
            consultation_date: at("2025-01-10T10:00:00Z"),
            discount_code: "HAIR-AB23CD".to_string(),
            discount_amount: "50.00 EUR".to_string(),
            valid_from: at("2025-01-10T10:00:00Z"),
            valid_until: at("2025-01-12T10:00:00Z"),
        }
    }

    fn test_key() -> SecretString {
        SecretString::new("re_test".to_string())
    }

    fn sender() -> ResendEmailSender {
        ResendEmailSender::new(ResendConfig::new(test_key(), "Salon <hello@example.com>")).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = ResendConfig::new(test_key(), "Salon <hello@example.com>");
        assert_eq!(config.base_url, "https://api.resend.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn emails_url_tolerates_trailing_slash() {
        let sender = ResendEmailSender::new(
            ResendConfig::new(test_key(), "x@example.com").with_base_url("http://localhost:9/"),
        )
        .unwrap();
        assert_eq!(sender.emails_url(), "http://localhost:9/emails");
    }

    #[test]
    fn request_contains_code_and_window() {
        let request = sender().build_request(&confirmation("Ada"));

        assert_eq!(request.to, vec!["ada@example.com".to_string()]);
        assert_eq!(request.from, "Salon <hello@example.com>");
        assert!(request.text.starts_with("Hello Ada,"));
        assert!(request.text.contains("HAIR-AB23CD"));
        assert!(request.text.contains("50.00 EUR"));
        assert!(request.text.contains("2025-01-12 10:00 UTC"));
    }

    #[test]
    fn request_without_name_uses_plain_greeting() {
        let request = sender().build_request(&confirmation("  "));
        assert!(request.text.starts_with("Hello,"));
    }

    #[test]
    fn request_serializes_to_resend_shape() {
        let json = serde_json::to_value(sender().build_request(&confirmation("Ada"))).unwrap();

        assert_eq!(json["to"][0], "ada@example.com");
        assert!(json["subject"].is_string());
        assert!(json["text"].is_string());
    }

    #[tokio::test]
    async fn unreachable_api_is_notification_failure() {
        let sender = ResendEmailSender::new(
            ResendConfig::new(test_key(), "x@example.com")
                .with_base_url("http://127.0.0.1:1")
                .with_timeout(Duration::from_millis(500)),
        )
        .unwrap();

        let err = sender
            .send_consultation_confirmation(&confirmation("Ada"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotificationFailed);
    }
}
