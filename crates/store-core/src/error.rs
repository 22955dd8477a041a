//! # Checkout Error Types
//!
//! Typed error handling for the checkout engine.
//! All fallible checkout operations return `Result<T, CheckoutError>`.
//!
//! Access-gate failures are deliberately absent from this taxonomy: a
//! credential that cannot be trusted resolves to a redirect at the boundary
//! and never becomes an application error.

use thiserror::Error;

/// Core error type for checkout and payment operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Payment-intent creation against the gateway failed
    #[error("Intent creation failed: {0}")]
    IntentCreation(String),

    /// Payment gateway API error
    #[error("Gateway error [{provider}]: {message}")]
    Gateway { provider: String, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Payment was declined by the gateway
    #[error("Payment declined: {reason}")]
    PaymentDeclined { reason: String },

    /// A confirmation for this intent is already outstanding
    #[error("Submission already in flight for intent {intent_id}")]
    SubmissionInFlight { intent_id: String },

    /// Checkout step prerequisites unmet; navigation refused
    #[error("Pipeline blocked at step: {step}")]
    PipelineBlocked { step: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Returns true if the user may recover by resubmitting
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Network(_)
                | CheckoutError::Gateway { .. }
                | CheckoutError::IntentCreation(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::InvalidRequest(_) => 400,
            CheckoutError::ProductNotFound { .. } => 404,
            CheckoutError::IntentCreation(_) => 502,
            CheckoutError::Gateway { .. } => 502,
            CheckoutError::Network(_) => 503,
            CheckoutError::PaymentDeclined { .. } => 402,
            CheckoutError::SubmissionInFlight { .. } => 409,
            CheckoutError::PipelineBlocked { .. } => 409,
            CheckoutError::Serialization(_) => 500,
            CheckoutError::Internal(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::Network("timeout".into()).is_retryable());
        assert!(CheckoutError::Gateway {
            provider: "stripe".into(),
            message: "card_declined".into()
        }
        .is_retryable());
        assert!(!CheckoutError::InvalidRequest("bad data".into()).is_retryable());
        assert!(!CheckoutError::SubmissionInFlight {
            intent_id: "pi_1".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CheckoutError::InvalidRequest("test".into()).status_code(),
            400
        );
        assert_eq!(
            CheckoutError::ProductNotFound {
                product_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(
            CheckoutError::PaymentDeclined {
                reason: "insufficient funds".into()
            }
            .status_code(),
            402
        );
        assert_eq!(
            CheckoutError::PipelineBlocked {
                step: "payment".into()
            }
            .status_code(),
            409
        );
    }
}
