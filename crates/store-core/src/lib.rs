//! # store-core
//!
//! Core types and logic for the storefront checkout engine.
//!
//! This crate provides:
//! - `AccessGate` and `Claims` for role-based route protection
//! - `CartLedger` and `CartItem` for the shopping cart
//! - `PipelineController` and `PipelineStep` for the ordered checkout flow
//! - `Product` and `ProductCatalog` for the product catalog shape
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use store_core::{AccessGate, CartLedger, PipelineController, PipelineStep};
//!
//! // Gate an inbound navigation
//! let decision = gate.evaluate("/admin/products", Some(token));
//!
//! // Build up a cart
//! let mut cart = CartLedger::new();
//! cart.add_item(&product);
//!
//! // Walk the checkout pipeline
//! let mut pipeline = PipelineController::new();
//! pipeline.navigate(PipelineStep::Shipping, &cart);
//! ```

pub mod access;
pub mod cart;
pub mod error;
pub mod pipeline;
pub mod product;

// Re-exports for convenience
pub use access::{AccessGate, Claims, GateDecision};
pub use cart::{CartItem, CartLedger, PaymentMethod, ShippingAddress};
pub use error::{CheckoutError, CheckoutResult};
pub use pipeline::{PipelineController, PipelineStep};
pub use product::{Currency, Price, Product, ProductCatalog};
