//! # Purchase Pipeline
//!
//! The ordered checkout sequence: cart review, shipping, payment-method
//! selection, checkout confirmation. Forward navigation is gated on the
//! live cart ledger; backward navigation to any step already reached is
//! always allowed. Blocked navigation is not an error, the target step is
//! simply not navigable.

use crate::cart::CartLedger;
use serde::{Deserialize, Serialize};

/// One stage of the ordered checkout sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    /// Cart review
    Order,
    /// Shipping address entry
    Shipping,
    /// Payment method selection
    PaymentMethod,
    /// Final confirmation and payment
    Checkout,
}

impl PipelineStep {
    /// All steps in pipeline order
    pub const ALL: [PipelineStep; 4] = [
        PipelineStep::Order,
        PipelineStep::Shipping,
        PipelineStep::PaymentMethod,
        PipelineStep::Checkout,
    ];

    /// Ordinal index, 0-3
    pub fn ordinal(&self) -> usize {
        match self {
            PipelineStep::Order => 0,
            PipelineStep::Shipping => 1,
            PipelineStep::PaymentMethod => 2,
            PipelineStep::Checkout => 3,
        }
    }

    /// Route bound to this step
    pub fn route(&self) -> &'static str {
        match self {
            PipelineStep::Order => "/cart",
            PipelineStep::Shipping => "/shipping",
            PipelineStep::PaymentMethod => "/payment",
            PipelineStep::Checkout => "/placeorder",
        }
    }

    /// Step for a given ordinal
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Whether this step's prerequisite holds against the ledger.
    ///
    /// Order and Shipping both require a non-empty cart; PaymentMethod
    /// requires a shipping address; Checkout requires a payment method.
    pub fn prerequisite_met(&self, ledger: &CartLedger) -> bool {
        match self {
            PipelineStep::Order => !ledger.is_empty(),
            PipelineStep::Shipping => !ledger.is_empty(),
            PipelineStep::PaymentMethod => ledger.shipping_address.is_some(),
            PipelineStep::Checkout => ledger.payment_method.is_some(),
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStep::Order => "order",
            PipelineStep::Shipping => "shipping",
            PipelineStep::PaymentMethod => "payment_method",
            PipelineStep::Checkout => "checkout",
        };
        write!(f, "{}", name)
    }
}

/// Tracks checkout progress for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineController {
    /// Highest ordinal reached this session
    highest_reached: usize,
}

impl PipelineController {
    /// Start at the cart-review step
    pub fn new() -> Self {
        Self::default()
    }

    /// The furthest step reached this session
    pub fn highest_reached(&self) -> PipelineStep {
        PipelineStep::from_ordinal(self.highest_reached).unwrap_or(PipelineStep::Order)
    }

    /// Filled-segment count for the progress indicator
    pub fn progress(&self) -> usize {
        self.highest_reached + 1
    }

    /// Whether navigating to `step` is permitted against the current ledger.
    ///
    /// Backward and lateral navigation is unconditional. Forward navigation
    /// requires the prerequisites of every step up to and including the
    /// target to hold.
    pub fn can_navigate(&self, step: PipelineStep, ledger: &CartLedger) -> bool {
        if step.ordinal() <= self.highest_reached {
            return true;
        }
        PipelineStep::ALL[..=step.ordinal()]
            .iter()
            .all(|s| s.prerequisite_met(ledger))
    }

    /// Navigate to `step` if permitted. Returns whether the navigation
    /// happened; a refusal leaves the controller untouched.
    pub fn navigate(&mut self, step: PipelineStep, ledger: &CartLedger) -> bool {
        if !self.can_navigate(step, ledger) {
            return false;
        }
        if step.ordinal() > self.highest_reached {
            self.highest_reached = step.ordinal();
        }
        true
    }

    /// Order completion: reset the ledger and return the pipeline to the
    /// cart-review step.
    pub fn complete(&mut self, ledger: &mut CartLedger) {
        ledger.reset();
        self.highest_reached = 0;
    }
}
