//! # Routes
//!
//! Axum router configuration for the checkout API. The access-gate
//! middleware wraps every route (and the fallback), so protected prefixes
//! are gated even when no route matches the exact path.

use crate::handlers;
use crate::middleware::access_gate;
use crate::state::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET  /api/products - List products
///   - GET  /api/products/{id} - Get product by ID
///
/// - Cart:
///   - GET    /api/cart - Current cart
///   - POST   /api/cart/items - Add a product
///   - POST   /api/cart/items/{id}/increment - Increment quantity
///   - POST   /api/cart/items/{id}/decrement - Decrement quantity
///   - DELETE /api/cart/items/{id} - Remove an item
///   - PUT    /api/cart/shipping-address - Set shipping address
///   - PUT    /api/cart/payment-method - Select payment method
///   - PUT    /api/cart/checking-out - Mark checkout in progress
///
/// - Pipeline & orders:
///   - GET  /api/pipeline - Progress and navigable steps
///   - POST /api/pipeline/navigate - Navigate to a step
///   - POST /api/orders/create-payment-intent - Create payment intent
///   - POST /api/orders/confirm-payment - Confirm payment intent
///   - POST /api/signout - Drop the session
///
/// - Gated areas:
///   - GET /admin - Canonical admin dashboard
///   - GET /seller/dashboard - Canonical seller dashboard
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - allow all origins for now
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cart_routes = Router::new()
        .route("/", get(handlers::get_cart))
        .route("/items", post(handlers::add_cart_item))
        .route("/items/{product_id}", delete(handlers::remove_cart_item))
        .route(
            "/items/{product_id}/increment",
            post(handlers::increment_cart_item),
        )
        .route(
            "/items/{product_id}/decrement",
            post(handlers::decrement_cart_item),
        )
        .route("/shipping-address", put(handlers::set_shipping_address))
        .route("/payment-method", put(handlers::set_payment_method))
        .route("/checking-out", put(handlers::set_checking_out));

    let order_routes = Router::new()
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route("/confirm-payment", post(handlers::confirm_payment));

    let api_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product))
        .nest("/cart", cart_routes)
        .route("/pipeline", get(handlers::get_pipeline))
        .route("/pipeline/navigate", post(handlers::navigate_pipeline))
        .nest("/orders", order_routes)
        .route("/signout", post(handlers::signout));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Gated areas (the middleware below decides who gets here)
        .route("/admin", get(handlers::admin_dashboard))
        .route("/seller/dashboard", get(handlers::seller_dashboard))
        // API
        .nest("/api", api_routes)
        // Middleware (the gate also covers the 404 fallback, so legacy
        // sub-paths canonicalize before routing matters)
        .layer(from_fn_with_state(state.clone(), access_gate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
