//! # checkout-razorpay
//!
//! Razorpay Checkout boundary for razorpay-checkout-rs.
//!
//! Razorpay Checkout is a script (`checkout.js`) exposing a global
//! `Razorpay` constructor. The constructed widget reports success through
//! the `handler` option and failure through the `payment.failed` event.
//! This crate holds what is specific to that contract:
//!
//! - [`RazorpayConfig`] - key id and script location
//! - [`decode_success`] / [`decode_failure`] - callback payload decoding
//! - [`event_name`] - wire names for [`WidgetEvent`]s
//!
//! Platform adapters (the browser bindings, the simulator) implement
//! `checkout_core::CheckoutSdk` and delegate decoding here.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_razorpay::RazorpayConfig;
//! use checkout_core::CheckoutSettings;
//!
//! let razorpay = RazorpayConfig::from_env()?;
//! let settings = CheckoutSettings::from_env(razorpay.key_id.clone())?;
//! ```

pub mod config;
pub mod payload;

use checkout_core::WidgetEvent;

// Re-exports
pub use config::RazorpayConfig;
pub use payload::{decode_failure, decode_success, HandlerResponse};

/// Razorpay Checkout script
pub const RAZORPAY_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// Global constructor installed by the script
pub const RAZORPAY_GLOBAL: &str = "Razorpay";

/// Event fired when a payment attempt fails
pub const PAYMENT_FAILED_EVENT: &str = "payment.failed";

/// Wire name of a widget event
pub fn event_name(event: WidgetEvent) -> &'static str {
    match event {
        WidgetEvent::PaymentFailed => PAYMENT_FAILED_EVENT,
    }
}
