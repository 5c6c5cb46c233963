//! HTTP handlers for discount endpoints.
//!
//! These handlers connect Axum routes to the discount command/query handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::error;

use crate::application::{
    ProcessPaymentWebhookCommand, ProcessPaymentWebhookHandler, RedeemDiscountCodeCommand,
    RedeemDiscountCodeHandler, ValidateDiscountCodeHandler, ValidateDiscountCodeQuery,
};
use crate::domain::discount::{DiscountError, DiscountPolicy};
use crate::domain::foundation::Timestamp;
use crate::domain::payment::StripeWebhookVerifier;
use crate::ports::{DiscountStore, NotificationSender};

use super::dto::{
    ErrorResponse, HealthResponse, RedeemRequest, RedeemResponse, ValidateRequest,
    ValidateResponse, WebhookResponse,
};

/// Header carrying the Stripe webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the discount routes.
///
/// Cloned per request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct DiscountAppState {
    pub store: Arc<dyn DiscountStore>,
    pub notifier: Arc<dyn NotificationSender>,
    pub verifier: Arc<StripeWebhookVerifier>,
    pub policy: DiscountPolicy,
}

impl DiscountAppState {
    pub fn new(
        store: Arc<dyn DiscountStore>,
        notifier: Arc<dyn NotificationSender>,
        verifier: Arc<StripeWebhookVerifier>,
        policy: DiscountPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            verifier,
            policy,
        }
    }

    pub fn webhook_handler(&self) -> ProcessPaymentWebhookHandler {
        ProcessPaymentWebhookHandler::new(
            self.store.clone(),
            self.notifier.clone(),
            self.verifier.clone(),
            self.policy.clone(),
        )
    }

    pub fn validate_handler(&self) -> ValidateDiscountCodeHandler {
        ValidateDiscountCodeHandler::new(self.store.clone())
    }

    pub fn redeem_handler(&self) -> RedeemDiscountCodeHandler {
        RedeemDiscountCodeHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/stripe - Issue a discount code for a paid consultation
pub async fn handle_stripe_webhook(
    State(state): State<DiscountAppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, DiscountApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            DiscountError::InvalidWebhookSignature("missing Stripe-Signature header".to_string())
        })?;

    let cmd = ProcessPaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    let result = state.webhook_handler().handle(cmd).await?;

    Ok(Json(WebhookResponse::from(result)))
}

/// POST /api/discount-codes/validate - Check a code at checkout
pub async fn validate_discount_code(
    State(state): State<DiscountAppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DiscountApiError> {
    let Json(request) = payload.map_err(body_error)?;

    let query = ValidateDiscountCodeQuery {
        code: request.code.unwrap_or_default(),
        at: Timestamp::now(),
    };

    let result = state.validate_handler().handle(query).await?;

    Ok(Json(ValidateResponse::from(result)))
}

/// POST /api/discount-codes/redeem - Mark a code used for an order
pub async fn redeem_discount_code(
    State(state): State<DiscountAppState>,
    payload: Result<Json<RedeemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DiscountApiError> {
    let Json(request) = payload.map_err(body_error)?;

    let cmd = RedeemDiscountCodeCommand {
        code: request.code.unwrap_or_default(),
        order_id: request.order_id,
        at: Timestamp::now(),
    };

    let result = state.redeem_handler().handle(cmd).await?;

    Ok(Json(RedeemResponse::from(result)))
}

/// GET /health - Liveness check
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

fn body_error(rejection: JsonRejection) -> DiscountError {
    DiscountError::invalid_input("body", rejection.body_text())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts discount errors to HTTP responses.
#[derive(Debug)]
pub struct DiscountApiError(DiscountError);

impl From<DiscountError> for DiscountApiError {
    fn from(err: DiscountError) -> Self {
        Self(err)
    }
}

impl IntoResponse for DiscountApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, code = self.0.code(), "Discount request failed");
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}
