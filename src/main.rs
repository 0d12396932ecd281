//! VOD Access server binary.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vod_access::adapters::http::{build_router, AppState};
use vod_access::adapters::postgres::{
    PostgresCatalogReader, PostgresEntitlementLedger, PostgresUserRepository,
};
use vod_access::adapters::stripe::StripeBillingAdapter;
use vod_access::config::AppConfig;
use vod_access::domain::billing::StripeWebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    if config.payment.is_test_mode() {
        tracing::warn!("Stripe is in test mode");
    }

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let stripe = Arc::new(StripeBillingAdapter::new(config.payment.stripe_config()));
    let verifier = StripeWebhookVerifier::new(
        config.payment.stripe_webhook_secret.expose_secret().as_str(),
    );

    let state = AppState {
        catalog: Arc::new(PostgresCatalogReader::new(pool.clone())),
        ledger: Arc::new(PostgresEntitlementLedger::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool)),
        prices: stripe.clone(),
        billing: stripe,
        webhook_verifier: Arc::new(verifier),
        public_base_url: config.server.base_url().to_string(),
    };

    let router = build_router(state, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "VOD access server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level. Production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
