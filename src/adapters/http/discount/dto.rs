//! HTTP DTOs for the discount endpoints.
//!
//! Wire names are camelCase. Timestamps are RFC 3339 strings.

use serde::{Deserialize, Serialize};

use crate::application::{
    ProcessPaymentWebhookResult, RedeemDiscountCodeResult, ValidateDiscountCodeResult,
};
use crate::domain::discount::DiscountError;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/discount-codes/validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[serde(default)]
    pub code: Option<String>,
}

/// Body of `POST /api/discount-codes/redeem`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Discount details returned for a valid code.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountView {
    pub code: String,
    /// Amount in minor currency units.
    pub amount: i64,
    pub expires_at: String,
}

/// Response for code validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activates_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountView>,
}

impl From<ValidateDiscountCodeResult> for ValidateResponse {
    fn from(result: ValidateDiscountCodeResult) -> Self {
        match result {
            ValidateDiscountCodeResult::Valid {
                code,
                amount_cents,
                expires_at,
            } => Self {
                valid: true,
                error: None,
                activates_at: None,
                discount: Some(DiscountView {
                    code: code.to_string(),
                    amount: amount_cents,
                    expires_at: expires_at.to_rfc3339(),
                }),
            },
            ValidateDiscountCodeResult::Rejected(rejection) => Self {
                valid: false,
                error: Some(rejection.message().to_string()),
                activates_at: rejection.activates_at().map(|t| t.to_rfc3339()),
                discount: None,
            },
        }
    }
}

/// Response for code redemption.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RedeemDiscountCodeResult> for RedeemResponse {
    fn from(result: RedeemDiscountCodeResult) -> Self {
        match result {
            RedeemDiscountCodeResult::Redeemed { .. } => Self {
                success: true,
                error: None,
            },
            RedeemDiscountCodeResult::Rejected(rejection) => Self {
                success: false,
                error: Some(rejection.message().to_string()),
            },
        }
    }
}

/// Acknowledgement returned to the payment processor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

impl From<ProcessPaymentWebhookResult> for WebhookResponse {
    fn from(result: ProcessPaymentWebhookResult) -> Self {
        match result {
            ProcessPaymentWebhookResult::Issued {
                consultation_id,
                discount_code,
                ..
            }
            | ProcessPaymentWebhookResult::AlreadyIssued {
                consultation_id,
                discount_code,
            } => Self {
                received: true,
                consultation_id: Some(consultation_id.to_string()),
                discount_code: Some(discount_code.to_string()),
            },
            ProcessPaymentWebhookResult::Ignored { .. } => Self {
                received: true,
                consultation_id: None,
                discount_code: None,
            },
        }
    }
}

/// Liveness check body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error body: `{ "error": { "code", "message" } }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl From<&DiscountError> for ErrorResponse {
    fn from(err: &DiscountError) -> Self {
        Self::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::discount::{DiscountCode, RedemptionRejection, ValidationRejection};
    use crate::domain::foundation::{ConsultationId, DomainError, Timestamp};

    fn at(value: &str) -> Timestamp {
        Timestamp::parse_rfc3339("at", value).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Requests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn redeem_request_reads_camel_case_order_id() {
        let request: RedeemRequest =
            serde_json::from_str(r#"{"code":"HAIR-AB23CD","orderId":"order-9"}"#).unwrap();
        assert_eq!(request.code.as_deref(), Some("HAIR-AB23CD"));
        assert_eq!(request.order_id.as_deref(), Some("order-9"));
    }

    #[test]
    fn validate_request_tolerates_missing_code() {
        let request: ValidateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.code.is_none());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Responses
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn valid_code_response_carries_discount() {
        let response = ValidateResponse::from(ValidateDiscountCodeResult::Valid {
            code: DiscountCode::from_persisted("HAIR-AB23CD"),
            amount_cents: 5000,
            expires_at: at("2025-01-12T10:00:00Z"),
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["valid"], true);
        assert_eq!(json["discount"]["code"], "HAIR-AB23CD");
        assert_eq!(json["discount"]["amount"], 5000);
        assert_eq!(json["discount"]["expiresAt"], "2025-01-12T10:00:00Z");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn early_code_response_carries_activation_time() {
        let response = ValidateResponse::from(ValidateDiscountCodeResult::Rejected(
            ValidationRejection::NotYetActive {
                activates_at: at("2025-01-10T10:00:00Z"),
            },
        ));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "Discount code is not active yet");
        assert_eq!(json["activatesAt"], "2025-01-10T10:00:00Z");
        assert!(json.get("discount").is_none());
    }

    #[test]
    fn rejected_redemption_response_has_error() {
        let response = RedeemResponse::from(RedeemDiscountCodeResult::Rejected(
            RedemptionRejection::NotFoundOrAlreadyUsed,
        ));
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Discount code not found or already used")
        );
    }

    #[test]
    fn ignored_webhook_response_is_bare_acknowledgement() {
        let json = serde_json::to_value(WebhookResponse::from(
            ProcessPaymentWebhookResult::Ignored {
                reason: "unhandled event".to_string(),
            },
        ))
        .unwrap();
        assert_eq!(json, serde_json::json!({ "received": true }));
    }

    #[test]
    fn issued_webhook_response_names_code() {
        let id = ConsultationId::new();
        let json = serde_json::to_value(WebhookResponse::from(
            ProcessPaymentWebhookResult::Issued {
                consultation_id: id,
                discount_code: DiscountCode::from_persisted("HAIR-AB23CD"),
                notified: false,
            },
        ))
        .unwrap();
        assert_eq!(json["consultationId"], id.to_string());
        assert_eq!(json["discountCode"], "HAIR-AB23CD");
    }

    #[test]
    fn server_error_body_hides_store_detail() {
        let err = DiscountError::from(DomainError::database("connection reset by peer"));
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();

        assert_eq!(json["error"]["code"], "PERSISTENCE_ERROR");
        assert_eq!(json["error"]["message"], "Internal server error");
        assert!(!json.to_string().contains("connection reset"));
    }
}
