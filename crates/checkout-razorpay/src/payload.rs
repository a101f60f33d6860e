//! # Razorpay Callback Payloads
//!
//! Decoding for the two channels Razorpay Checkout reports through: the
//! `handler` option (success) and the `payment.failed` event.

use checkout_core::{CheckoutError, CheckoutResult, PaymentFailure, PaymentSuccess};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Success payload passed to the `handler` option
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerResponse {
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

/// Decode the `handler` payload.
///
/// `razorpay_payment_id` is required; order id and signature are only
/// present when the checkout was opened against an order.
pub fn decode_success(payload: &Value) -> CheckoutResult<PaymentSuccess> {
    let response: HandlerResponse = serde_json::from_value(payload.clone()).map_err(|e| {
        CheckoutError::Widget(format!("Unrecognised Razorpay success payload: {}", e))
    })?;

    if response.razorpay_order_id.is_none() || response.razorpay_signature.is_none() {
        debug!(
            payment_id = %response.razorpay_payment_id,
            "Success payload without order id or signature"
        );
    }

    Ok(PaymentSuccess::new(
        response.razorpay_payment_id,
        response.razorpay_order_id.unwrap_or_default(),
        response.razorpay_signature.unwrap_or_default(),
    ))
}

/// Decode a `payment.failed` event payload.
///
/// The reason comes from `error.description`, then `error.message`, then
/// `error.reason`. The raw value is the `error` object, or the whole
/// payload when it has none.
pub fn decode_failure(payload: &Value) -> PaymentFailure {
    let error = payload.get("error").unwrap_or(payload);

    let text = |field: &str| {
        error
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
    };

    let reason = text("description")
        .or_else(|| text("message"))
        .or_else(|| text("reason"))
        .unwrap_or_default();

    let mut failure = PaymentFailure::new(reason).with_raw(error.clone());
    if let Some(code) = text("code") {
        failure = failure.with_code(code);
    }
    failure
}
