//! # store-gateway
//!
//! Payment-gateway client and transaction orchestrator for the storefront
//! checkout engine.
//!
//! The payment protocol is two-phase and single-attempt:
//!
//! 1. **Intent creation** — the server asks the gateway for a
//!    `PaymentIntent` covering the cart total and hands the resulting
//!    `client_secret` to the client.
//! 2. **Confirmation** — the payment instrument is bound to the
//!    `client_secret` and submitted to the gateway; the outcome is one of
//!    `Succeeded`, a gateway error, or an explicit `RequiresAction`
//!    non-terminal state. Nothing is retried automatically.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use store_gateway::{GatewayClient, PaymentOrchestrator};
//!
//! let client = GatewayClient::from_env()?;
//! let intent = client.create_intent(total).await?;
//!
//! let mut orchestrator = PaymentOrchestrator::new(intent);
//! let secret = orchestrator.begin_submit()?;
//! let outcome = client.confirm_intent(&secret, "pm_card_visa").await;
//! if orchestrator.record_outcome(&outcome).just_succeeded {
//!     // complete the pipeline, reset the cart — exactly once
//! }
//! ```

pub mod config;
pub mod intent;
pub mod orchestrator;

// Re-exports
pub use config::GatewayConfig;
pub use intent::{ConfirmOutcome, GatewayClient, PaymentIntent};
pub use orchestrator::{IntentState, PaymentOrchestrator, SubmitResult};
