use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::handlers::{self, AppState};
use crate::webhook_handler;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the application router with all routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/call",
            post(handlers::echo).fallback(handlers::not_found),
        )
        .route(
            "/api/updateData",
            post(handlers::update_data).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/webhook",
            post(webhook_handler::call_webhook).fallback(webhook_handler::invalid_method),
        )
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
