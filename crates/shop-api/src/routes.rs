//! # Routes
//!
//! Axum router configuration for the product API.

use crate::handlers;
use crate::middleware;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

/// Create the main application router
///
/// Routes:
/// - Auth:
///   - POST /login - Issue access/refresh tokens
///   - GET  /protected - Bearer-gated, returns the subject id
///
/// - Products:
///   - GET    /products?sort=id|name - List products
///   - POST   /products - Create product
///   - GET    /products/{id} - Get product
///   - PUT    /products/{id} - Replace product
///   - PATCH  /products/{id} - Partially update product
///   - DELETE /products/{id} - Delete product
///
/// Middleware order: request logging → authorization → handler.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().on_response(
        DefaultOnResponse::new()
            .level(Level::INFO)
            .latency_unit(LatencyUnit::Millis),
    );

    let auth_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/protected", get(handlers::protected));

    let product_routes = Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product)
                .put(handlers::replace_product)
                .patch(handlers::patch_product)
                .delete(handlers::delete_product),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .merge(auth_routes)
        .merge(product_routes)
        .fallback(handlers::not_found_fallback)
        // Authorization runs inside the request logging
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}
