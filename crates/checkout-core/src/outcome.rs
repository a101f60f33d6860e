//! # Checkout Outcomes
//!
//! What a checkout attempt settles with. Exactly one outcome is produced
//! per attempt.

use serde::{Deserialize, Serialize};

/// Identifiers reported by the widget after a completed payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSuccess {
    /// Provider payment id (e.g. `pay_...`)
    pub payment_id: String,

    /// Order reference the payment was made against
    pub order_reference: String,

    /// Provider signature over order and payment ids
    pub signature: String,
}

impl PaymentSuccess {
    pub fn new(
        payment_id: impl Into<String>,
        order_reference: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            payment_id: payment_id.into(),
            order_reference: order_reference.into(),
            signature: signature.into(),
        }
    }
}

/// A widget-reported payment failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentFailure {
    /// Human-readable reason (e.g. "card declined")
    pub reason: String,

    /// Provider error code, when one was reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// The provider's error object, untouched
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl PaymentFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            code: None,
            raw: serde_json::Value::Null,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }
}

/// Settled result of one checkout attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    Success(PaymentSuccess),
    Failure(PaymentFailure),
}

impl CheckoutOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckoutOutcome::Success(_))
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            CheckoutOutcome::Success(_) => "success",
            CheckoutOutcome::Failure(_) => "failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = CheckoutOutcome::Success(PaymentSuccess::new("pay_1", "order_1", "sig"));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["payment_id"], "pay_1");
    }

    #[test]
    fn test_failure_builder() {
        let failure = PaymentFailure::new("card declined")
            .with_code("BAD_REQUEST_ERROR")
            .with_raw(json!({ "description": "card declined" }));

        assert_eq!(failure.code.as_deref(), Some("BAD_REQUEST_ERROR"));
        assert_eq!(failure.raw["description"], "card declined");
        assert!(!CheckoutOutcome::Failure(failure).is_success());
    }
}
