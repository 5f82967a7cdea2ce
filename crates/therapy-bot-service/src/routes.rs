//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use therapy_bot_core::CALLBACK_PATH;

use crate::handlers::{health, mpesa, telegram};
use crate::state::AppState;

/// Maximum concurrent webhook requests being processed.
/// Each one may hold several outbound provider calls open.
const WEBHOOK_MAX_CONCURRENT_REQUESTS: usize = 64;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `POST /webhook/:token` - Telegram updates (token must match the bot token)
/// - `POST /mpesa/callback/:correlation_id` - STK Push results (always 200)
///
/// The callback route must answer 200 to everything, so it sits outside the
/// body limit and timeout layers. Its body is capped by `DefaultBodyLimit`,
/// which the handler sees as an extractor error.
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let webhook_routes = Router::new()
        .route("/webhook/:token", post(telegram::telegram_webhook))
        .layer(ConcurrencyLimitLayer::new(WEBHOOK_MAX_CONCURRENT_REQUESTS));

    let callback_routes = Router::new()
        .route(
            &format!("{CALLBACK_PATH}/:correlation_id"),
            post(mpesa::mpesa_callback),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(ConcurrencyLimitLayer::new(WEBHOOK_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no concurrency limit)
        .route("/health", get(health::health))
        .merge(webhook_routes)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .merge(callback_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
