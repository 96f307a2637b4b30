//! Route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use common::AppError;

use crate::handlers::{auth_routes, health_check, profile_routes};
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no auth)
        .route("/health", get(health_check))
        // Registration and login (no auth)
        .nest("/auth", auth_routes())
        // Profile routes (bearer token required)
        .nest(
            "/user",
            profile_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
