// Route modules
pub mod admin;
pub mod credits;
pub mod health;

use crate::{
    app_state::AppState,
    middleware::{jwt_auth_middleware, logging_middleware},
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes(state.clone()))
        .with_state(state)
}

/// API v1 routes
fn api_v1_routes(state: AppState) -> Router<AppState> {
    // Tenant-facing routes requiring authentication
    let tenant_routes = Router::new()
        .route("/credits", get(credits::get_credits))
        .route("/credits/transactions", get(credits::list_transactions))
        .route("/credits/verify-payment", post(credits::verify_payment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    // Administrative routes: same authentication, admin role checked in handlers
    let admin_routes = Router::new()
        .route(
            "/admin/credits/{tenant_id}",
            post(admin::admin_credit).put(admin::admin_reset),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new().route("/health", get(health::health_check));

    // Combine all routes with request logging
    Router::new()
        .merge(tenant_routes)
        .merge(admin_routes)
        .merge(public_routes)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
}
