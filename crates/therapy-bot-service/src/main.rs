//! Therapy Bot Service - Telegram bot with M-Pesa session payments
//!
//! This is the main entry point for the therapy bot service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use therapy_bot_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,therapy_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Therapy Bot Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        telegram_configured = !config.telegram_token.is_empty(),
        mpesa_configured = !config.mpesa.consumer_key.is_empty(),
        "Service configuration loaded"
    );

    // Build app state
    let state = AppState::new(config.clone())?;

    // Create the router
    let app = create_router(state);

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
