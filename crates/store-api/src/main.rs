//! # Storegate
//!
//! Checkout and access-control core for the storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export GATEWAY_SECRET_KEY=sk_test_...
//! export GATEWAY_PUBLISHABLE_KEY=pk_test_...
//! export GATE_SIGNING_SECRET=...
//!
//! # Run the server
//! storegate
//! ```

use store_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Storegate starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Cart: GET http://{}/api/cart", addr);
        info!(
            "Payment intent: POST http://{}/api/orders/create-payment-intent",
            addr
        );
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
