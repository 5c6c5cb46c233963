//! Consultation discounts HTTP service.

use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use consultation_discounts::adapters::{
    discount_router, DiscountAppState, PostgresDiscountStore, ResendConfig, ResendEmailSender,
};
use consultation_discounts::config::{AppConfig, DatabaseConfig, LogFormat, ServerConfig};
use consultation_discounts::domain::payment::StripeWebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let pool = connect_database(&config.database).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let store = Arc::new(PostgresDiscountStore::new(
        pool,
        config.database.query_timeout(),
    ));

    let notifier = Arc::new(ResendEmailSender::new(
        ResendConfig::new(config.email.resend_api_key.clone(), config.email.from_header())
            .with_base_url(config.email.api_base_url.clone())
            .with_timeout(config.email.timeout()),
    )?);

    let verifier = Arc::new(
        StripeWebhookVerifier::new(config.payment.stripe_webhook_secret.clone())
            .require_livemode(config.payment.require_livemode),
    );

    let state = DiscountAppState::new(store, notifier, verifier, config.discount.to_policy());

    let app = discount_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        livemode_required = config.payment.require_livemode,
        "Consultation discount service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down cleanly");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn connect_database(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .test_before_acquire(true)
        .connect(&config.url)
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
