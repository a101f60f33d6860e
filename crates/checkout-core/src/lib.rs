//! # checkout-core
//!
//! Checkout orchestration for a client-side payment form.
//!
//! This crate provides:
//! - `ScriptLoader` to load the checkout SDK script at most once per page
//! - `build_session` to turn a `CheckoutConfig` into the widget's options
//! - `CheckoutBridge` to open the widget and await exactly one outcome
//! - `OrderReferenceSource` and the `LocalOrderReference` placeholder
//! - `PaymentForm` to validate input, run attempts and report results
//! - `CheckoutError` for typed error handling
//!
//! Everything is single-threaded (`Rc`/`RefCell`) and runtime-agnostic:
//! it runs on the browser event loop through `wasm-bindgen-futures` or on
//! a tokio current-thread runtime.
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutBridge, CheckoutSettings, LocalOrderReference, LogNotifier, PaymentForm, ScriptLoader};
//!
//! let loader = ScriptLoader::new(injector);
//! let bridge = CheckoutBridge::new(sdk, loader);
//! let form = PaymentForm::new(CheckoutSettings::new("rzp_test_..."), bridge, LocalOrderReference::new(), LogNotifier)
//!     .on_success(|payment_id, order_id, signature| { /* verify on your backend */ });
//!
//! form.set_name("Asha Rao");
//! form.set_email("asha@example.com");
//! form.set_phone("9876543210");
//! form.submit().await;
//! ```

pub mod bridge;
pub mod checkout;
pub mod coordinator;
pub mod error;
pub mod loader;
pub mod money;
pub mod notify;
pub mod order_ref;
pub mod outcome;
pub mod session;
pub mod settings;
pub mod settlement;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use bridge::{CheckoutBridge, CheckoutSdk, CheckoutWidget, PayloadCallback, WidgetEvent};
pub use checkout::{CheckoutConfig, Prefill};
pub use coordinator::{FormState, PaymentForm, SubmitOutcome};
pub use error::{CheckoutError, CheckoutResult};
pub use loader::{LoaderState, ScriptInjector, ScriptLoader};
pub use notify::{
    LogNotifier, Notification, NotificationVariant, Notifier, RecordingNotifier,
};
pub use order_ref::{LocalOrderReference, OrderReferenceSource};
pub use outcome::{CheckoutOutcome, PaymentFailure, PaymentSuccess};
pub use session::{build_session, SessionDescriptor, Theme};
pub use settings::CheckoutSettings;
