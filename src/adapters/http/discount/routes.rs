//! Axum router configuration for discount endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{
    handle_stripe_webhook, health, redeem_discount_code, validate_discount_code,
    DiscountAppState,
};

/// Checkout-facing routes, callable from any storefront origin.
///
/// # Routes
/// - `POST /validate` - Validate a code at checkout
/// - `POST /redeem` - Redeem a code against an order
pub fn discount_code_routes() -> Router<DiscountAppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/validate", post(validate_discount_code))
        .route("/redeem", post(redeem_discount_code))
        .layer(cors)
}

/// Payment processor webhooks. No CORS; requests are verified via signature.
///
/// # Routes
/// - `POST /stripe` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<DiscountAppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}

/// Create the complete discount service router.
///
/// Mounts `/api/discount-codes`, `/api/webhooks` and `GET /health`.
pub fn discount_router() -> Router<DiscountAppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/discount-codes", discount_code_routes())
        .nest("/api/webhooks", webhook_routes())
}
