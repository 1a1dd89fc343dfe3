//! HTTP surface of the safety-aware routing engine.

pub mod config;
pub mod error;
mod handlers;
pub mod state;
pub mod transit_client;

use std::sync::Arc;

use axum::error_handling::HandleErrorLayer;
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use axum::{BoxError, Router};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerSettings;
use crate::error::ApiError;
use crate::handlers::{
    health_handler, itinerary_handler, overlay_handler, roads_handler, route_handler,
};
use crate::state::AppState;

pub fn app(state: Arc<AppState>, settings: &ServerSettings) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/roads", post(roads_handler))
        .route("/route", post(route_handler))
        .route("/itinerary", post(itinerary_handler))
        .route("/overlay", get(overlay_handler))
        .route("/health", get(health_handler))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer)
                .layer(HandleErrorLayer::new(handle_middleware_error))
                // one permit pool shared by every route
                .layer(GlobalConcurrencyLimitLayer::new(
                    settings.concurrency_limit.max(1),
                ))
                .timeout(settings.request_timeout()),
        )
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("no such endpoint".to_string())
}

async fn handle_middleware_error(error: BoxError) -> (StatusCode, String) {
    if error.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("unhandled internal error: {error}"),
        )
    }
}
