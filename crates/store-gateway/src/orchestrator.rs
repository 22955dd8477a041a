//! # Payment Transaction Orchestrator
//!
//! Session-level state machine around one payment intent. The orchestrator
//! owns the in-flight guard (no second confirmation while one is
//! outstanding), maps confirmation outcomes onto intent states, and latches
//! success so the completion side effects (pipeline advance, cart reset)
//! fire exactly once per intent.
//!
//! The orchestrator performs no I/O itself; the caller drives the
//! `GatewayClient` between `begin_submit` and `record_outcome`, so the
//! session lock need not be held across the network call.

use crate::intent::{ConfirmOutcome, PaymentIntent};
use serde::Serialize;
use store_core::{CheckoutError, CheckoutResult};
use tracing::{info, warn};

/// Lifecycle state of a payment intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentState {
    /// Intent created, not yet submitted
    Created,
    /// A confirmation call is outstanding
    Confirming,
    /// Terminal success
    Succeeded,
    /// Terminal failure; a fresh intent is needed
    Failed,
    /// Gateway reported a non-terminal status; resumable
    RequiresAction,
}

impl IntentState {
    /// Whether the intent has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, IntentState::Succeeded | IntentState::Failed)
    }
}

/// What `record_outcome` decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitResult {
    /// The state after recording
    pub state: IntentState,
    /// True only on the transition into `Succeeded`. Completion side
    /// effects must key off this, never off the state itself.
    pub just_succeeded: bool,
}

/// Drives one payment intent to a terminal state
#[derive(Debug, Clone)]
pub struct PaymentOrchestrator {
    intent: PaymentIntent,
    state: IntentState,
    in_flight: bool,
    completed: bool,
}

impl PaymentOrchestrator {
    /// Wrap a freshly created intent
    pub fn new(intent: PaymentIntent) -> Self {
        Self {
            intent,
            state: IntentState::Created,
            in_flight: false,
            completed: false,
        }
    }

    /// The wrapped intent
    pub fn intent(&self) -> &PaymentIntent {
        &self.intent
    }

    /// Current lifecycle state
    pub fn state(&self) -> IntentState {
        self.state
    }

    /// Begin a confirmation attempt, returning the client secret to submit.
    ///
    /// Refused while a confirmation is outstanding (the duplicate-charge
    /// guard) and once the intent is terminal.
    pub fn begin_submit(&mut self) -> CheckoutResult<String> {
        if self.in_flight {
            warn!("Refusing re-submission of intent {}", self.intent.id);
            return Err(CheckoutError::SubmissionInFlight {
                intent_id: self.intent.id.clone(),
            });
        }
        match self.state {
            IntentState::Created | IntentState::RequiresAction => {
                self.in_flight = true;
                self.state = IntentState::Confirming;
                Ok(self.intent.client_secret.clone())
            }
            IntentState::Succeeded => Err(CheckoutError::InvalidRequest(
                "Intent already succeeded".to_string(),
            )),
            IntentState::Failed => Err(CheckoutError::InvalidRequest(
                "Intent failed; create a new intent".to_string(),
            )),
            IntentState::Confirming => Err(CheckoutError::SubmissionInFlight {
                intent_id: self.intent.id.clone(),
            }),
        }
    }

    /// Record the result of the confirmation call started by `begin_submit`.
    pub fn record_outcome(
        &mut self,
        outcome: &CheckoutResult<ConfirmOutcome>,
    ) -> SubmitResult {
        self.in_flight = false;

        match outcome {
            Ok(ConfirmOutcome::Succeeded) => {
                self.state = IntentState::Succeeded;
                let first = !self.completed;
                self.completed = true;
                if first {
                    info!("Payment intent {} succeeded", self.intent.id);
                }
                SubmitResult {
                    state: self.state,
                    just_succeeded: first,
                }
            }
            Ok(ConfirmOutcome::RequiresAction { status }) => {
                info!(
                    "Payment intent {} not yet complete: status={}",
                    self.intent.id, status
                );
                self.state = IntentState::RequiresAction;
                SubmitResult {
                    state: self.state,
                    just_succeeded: false,
                }
            }
            Err(err) => {
                warn!("Payment intent {} failed: {}", self.intent.id, err);
                self.state = IntentState::Failed;
                SubmitResult {
                    state: self.state,
                    just_succeeded: false,
                }
            }
        }
    }
}
