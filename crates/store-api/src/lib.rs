//! # store-api
//!
//! HTTP API layer for the storefront checkout engine.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The access-gate middleware guarding `/admin/*` and `/seller/*`
//! - REST endpoints for the cart, the checkout pipeline, and payments
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/products` | List products |
//! | GET | `/api/products/{id}` | Get product |
//! | GET | `/api/cart` | Current cart |
//! | POST | `/api/cart/items` | Add a product to the cart |
//! | POST | `/api/cart/items/{id}/increment` | Increment quantity |
//! | POST | `/api/cart/items/{id}/decrement` | Decrement quantity (floor 1) |
//! | DELETE | `/api/cart/items/{id}` | Remove an item |
//! | PUT | `/api/cart/shipping-address` | Set the shipping address |
//! | PUT | `/api/cart/payment-method` | Select the payment method |
//! | PUT | `/api/cart/checking-out` | Mark checkout in progress |
//! | GET | `/api/pipeline` | Pipeline progress and navigable steps |
//! | POST | `/api/pipeline/navigate` | Navigate to a checkout step |
//! | POST | `/api/orders/create-payment-intent` | Create a payment intent |
//! | POST | `/api/orders/confirm-payment` | Confirm the payment intent |
//! | POST | `/api/signout` | Reset the session |

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
