//! # Checkout Error Types
//!
//! Typed error handling for the checkout orchestration core.
//! Every fallible operation returns `Result<T, CheckoutError>`.

use crate::outcome::PaymentFailure;
use serde_json::json;
use thiserror::Error;

/// Fallback text shown when a failure carries no usable reason
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong with the payment";

/// Core error type for all checkout operations
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// The checkout SDK script could not be loaded
    #[error("Checkout SDK unavailable: failed to load {url}")]
    SdkUnavailable { url: String },

    /// Caller misconfiguration (bad amount, missing currency, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The widget reported a failed payment (decline, cancellation)
    #[error("Payment failed: {}", .0.reason)]
    Failure(PaymentFailure),

    /// No outcome arrived before the caller-supplied deadline
    #[error("Checkout timed out waiting for the widget")]
    Timeout,

    /// The order-reference backend could not be reached
    #[error("Order backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Settings errors (missing keys, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The widget could not be constructed or opened, or it went away
    /// without reporting an outcome
    #[error("Checkout widget error: {0}")]
    Widget(String),
}

impl CheckoutError {
    /// Returns true if the user may simply try again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::SdkUnavailable { .. }
                | CheckoutError::Failure(_)
                | CheckoutError::Timeout
                | CheckoutError::BackendUnavailable(_)
        )
    }

    /// Stable snake_case tag for logs and JS hosts
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::SdkUnavailable { .. } => "sdk_unavailable",
            CheckoutError::Validation(_) => "validation_error",
            CheckoutError::Failure(_) => "failure",
            CheckoutError::Timeout => "timeout",
            CheckoutError::BackendUnavailable(_) => "backend_unavailable",
            CheckoutError::Configuration(_) => "configuration",
            CheckoutError::Widget(_) => "widget",
        }
    }

    /// Human-readable reason for the failure notification
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::SdkUnavailable { .. } => {
                "Checkout SDK failed to load. Please check your internet connection.".to_string()
            }
            CheckoutError::Failure(failure) if !failure.reason.trim().is_empty() => {
                failure.reason.clone()
            }
            CheckoutError::Failure(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            CheckoutError::Timeout => "The payment window timed out. Please try again.".to_string(),
            CheckoutError::Validation(msg)
            | CheckoutError::BackendUnavailable(msg)
            | CheckoutError::Configuration(msg)
            | CheckoutError::Widget(msg) => {
                if msg.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    msg.clone()
                }
            }
        }
    }

    /// Payload handed to the caller's error callback.
    ///
    /// Widget failures forward the raw SDK error object untouched.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            CheckoutError::Failure(failure) => failure.raw.clone(),
            other => json!({
                "kind": other.kind(),
                "message": other.to_string(),
            }),
        }
    }
}

impl From<PaymentFailure> for CheckoutError {
    fn from(failure: PaymentFailure) -> Self {
        CheckoutError::Failure(failure)
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::SdkUnavailable { url: "x".into() }.is_retryable());
        assert!(CheckoutError::Timeout.is_retryable());
        assert!(CheckoutError::Failure(PaymentFailure::new("card declined")).is_retryable());
        assert!(!CheckoutError::Validation("bad amount".into()).is_retryable());
        assert!(!CheckoutError::Configuration("no key".into()).is_retryable());
    }

    #[test]
    fn test_user_message_falls_back_for_blank_reason() {
        let err = CheckoutError::Failure(PaymentFailure::new("  "));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = CheckoutError::Failure(PaymentFailure::new("card declined"));
        assert_eq!(err.user_message(), "card declined");
    }

    #[test]
    fn test_payload_forwards_raw_failure() {
        let failure = PaymentFailure::new("card declined")
            .with_raw(json!({ "description": "card declined", "code": "BAD_REQUEST_ERROR" }));
        let err = CheckoutError::from(failure);
        assert_eq!(err.payload()["code"], "BAD_REQUEST_ERROR");

        let err = CheckoutError::Timeout;
        assert_eq!(err.payload()["kind"], "timeout");
    }
}
