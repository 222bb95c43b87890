use anyhow::{Context, Result};
use donation_ledger::{
    config::Config,
    handlers::AppState,
    services::{LedgerStore, OrderService, PaypalClient},
    startup::build_router,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting donation ledger v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "PayPal environment: {} ({})",
        config.paypal_environment.as_str(),
        config.paypal_api_base
    );
    if !config.credentials_configured() {
        tracing::warn!("PAYPAL_CLIENT_ID/PAYPAL_SECRET not set, order endpoints will fail");
    }

    let ledger = Arc::new(LedgerStore::new(config.store_path.clone()));
    let gateway = Arc::new(PaypalClient::from_config(&config)?);
    let orders = Arc::new(OrderService::new(gateway, ledger.clone()));

    let state = AppState::new(orders, ledger, config.paypal_environment);
    let app = build_router(state, Some(config.static_dir.as_path()));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Ledger file: {}", config.store_path.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gracefully...");
}
