//! EcoPark booking server.
//!
//! Seeds the session calendar, then serves the booking API until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! PORT=8080 SMTP_SERVER=smtp.example.com cargo run --bin ecopark-server
//! ```

use anyhow::Context;
use ecopark_core::environment::SystemClock;
use ecopark_server::bootstrap::{activity_rules, booking_service, confirmation_notifier};
use ecopark_server::metrics::register_business_metrics;
use ecopark_server::{AppState, Config, build_router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!(
                    "{},ecopark_server=debug,ecopark_core=debug",
                    config.server.log_level
                ).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting EcoPark booking server...");
    tracing::info!(
        opening = %config.park.opening_time,
        closing = %config.park.closing_time,
        closed_weekday = %config.park.closed_weekday,
        horizon_days = config.park.booking_horizon_days,
        "Configuration loaded"
    );

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    register_business_metrics();

    let rules = activity_rules(&config)?;
    let (notifier, notification_worker) = confirmation_notifier(&config.notifications)
        .context("Failed to set up confirmation delivery")?;
    let service = booking_service(&config, rules, Arc::new(SystemClock), notifier);

    let state = AppState::new(Arc::new(service)).with_prometheus(prometheus);
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(address = %address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router owned the last queue sender; let pending confirmations drain.
    tracing::info!("Shutting down gracefully...");
    if tokio::time::timeout(Duration::from_secs(10), notification_worker)
        .await
        .is_err()
    {
        tracing::warn!("Pending confirmations not delivered before shutdown");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "Failed to listen for Ctrl+C");
    }
}
