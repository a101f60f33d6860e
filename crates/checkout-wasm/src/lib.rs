//! # checkout-wasm
//!
//! WebAssembly bindings for razorpay-checkout-rs.
//!
//! This crate provides:
//! - A `PaymentForm` class driving Razorpay Checkout from the browser
//! - A DOM script injector that loads `checkout.js` once per page
//! - Notification and result callbacks into the host page
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PaymentForm } from 'razorpay-checkout-wasm';
//!
//! await init();
//!
//! const form = new PaymentForm(
//!   { merchant_key: 'rzp_test_...', default_amount_minor: 100000 },
//!   (toast) => showToast(toast),
//!   (paymentId, orderId, signature) => verifyOnBackend(paymentId, orderId, signature),
//!   (error) => console.error('Payment failed:', error),
//! );
//!
//! form.setName('Asha Rao');
//! form.setEmail('asha@example.com');
//! form.setPhone('9876543210');
//! const result = await form.submit();
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod bindings;
pub mod dom;
pub mod sdk;

use checkout_core::{
    CheckoutBridge, CheckoutSettings, LocalOrderReference, Notification, Notifier, ScriptLoader,
    SubmitOutcome,
};
use checkout_razorpay::RazorpayConfig;
use dom::{sleep_ms, DomScriptInjector};
use sdk::{to_js, RazorpayJsSdk};
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

thread_local! {
    /// One loader per page, so every form shares one `checkout.js` load
    static PAGE_LOADER: ScriptLoader = ScriptLoader::new(DomScriptInjector);
}

/// The page-wide script loader
pub fn page_loader() -> ScriptLoader {
    PAGE_LOADER.with(ScriptLoader::clone)
}

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Forwards notifications to a JS function
struct JsNotifier {
    callback: js_sys::Function,
}

impl Notifier for JsNotifier {
    fn notify(&self, notification: Notification) {
        let result = to_js(&notification)
            .and_then(|value| self.callback.call1(&JsValue::NULL, &value));
        if let Err(err) = result {
            log(&format!(
                "notification callback failed: {}",
                bindings::js_error_message(&err)
            ));
        }
    }
}

type Form = checkout_core::PaymentForm<RazorpayJsSdk, LocalOrderReference, JsNotifier>;

/// Payment form driving Razorpay Checkout
#[wasm_bindgen(js_name = PaymentForm)]
pub struct WasmPaymentForm {
    form: Rc<Form>,
}

#[wasm_bindgen(js_class = PaymentForm)]
impl WasmPaymentForm {
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings: JsValue,
        notify: js_sys::Function,
        on_success: Option<js_sys::Function>,
        on_error: Option<js_sys::Function>,
    ) -> Result<WasmPaymentForm, JsValue> {
        // `script_url` rides along in the same object
        let script_url = js_sys::Reflect::get(&settings, &JsValue::from_str("script_url"))
            .ok()
            .and_then(|v| v.as_string());
        let settings: CheckoutSettings = serde_wasm_bindgen::from_value(settings)
            .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?;
        settings
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut razorpay = RazorpayConfig::new(settings.merchant_key.clone());
        if let Some(url) = script_url {
            razorpay = razorpay.with_script_url(url);
        }
        razorpay
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let bridge = CheckoutBridge::new(RazorpayJsSdk::new(razorpay), page_loader());
        let timeout_ms = settings.timeout_ms;
        let mut form = checkout_core::PaymentForm::new(
            settings,
            bridge,
            LocalOrderReference::new(),
            JsNotifier { callback: notify },
        );

        if let Some(callback) = on_success {
            form = form.on_success(move |payment_id, order_id, signature| {
                let result = callback.call3(
                    &JsValue::NULL,
                    &JsValue::from_str(payment_id),
                    &JsValue::from_str(order_id),
                    &JsValue::from_str(signature),
                );
                if let Err(err) = result {
                    log(&format!(
                        "success callback failed: {}",
                        bindings::js_error_message(&err)
                    ));
                }
            });
        }
        if let Some(callback) = on_error {
            form = form.on_error(move |err| {
                let payload = to_js(&err.payload()).unwrap_or(JsValue::NULL);
                if let Err(thrown) = callback.call1(&JsValue::NULL, &payload) {
                    log(&format!(
                        "error callback failed: {}",
                        bindings::js_error_message(&thrown)
                    ));
                }
            });
        }
        if let Some(ms) = timeout_ms {
            let ms = u32::try_from(ms).unwrap_or(u32::MAX);
            form = form.with_deadline(move || sleep_ms(ms));
        }

        Ok(Self { form: Rc::new(form) })
    }

    /// Amount field input, in major units
    #[wasm_bindgen(js_name = setAmount)]
    pub fn set_amount(&self, input: &str) {
        self.form.set_amount_major(input);
    }

    #[wasm_bindgen(js_name = setName)]
    pub fn set_name(&self, name: String) {
        self.form.set_name(name);
    }

    #[wasm_bindgen(js_name = setEmail)]
    pub fn set_email(&self, email: String) {
        self.form.set_email(email);
    }

    #[wasm_bindgen(js_name = setPhone)]
    pub fn set_phone(&self, phone: String) {
        self.form.set_phone(phone);
    }

    #[wasm_bindgen(getter, js_name = amountMinor)]
    pub fn amount_minor(&self) -> f64 {
        self.form.state().amount_minor as f64
    }

    #[wasm_bindgen(getter, js_name = amountDisplay)]
    pub fn amount_display(&self) -> String {
        self.form.amount_display()
    }

    #[wasm_bindgen(getter, js_name = buttonLabel)]
    pub fn button_label(&self) -> String {
        self.form.button_label()
    }

    #[wasm_bindgen(getter, js_name = isSubmitting)]
    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    /// Run one checkout attempt; resolves with a summary object
    pub fn submit(&self) -> js_sys::Promise {
        let form = Rc::clone(&self.form);
        wasm_bindgen_futures::future_to_promise(async move {
            let outcome = form.submit().await;
            to_js(&outcome_summary(&outcome))
        })
    }
}

/// JSON summary of a submit outcome for the host page
pub fn outcome_summary(outcome: &SubmitOutcome) -> serde_json::Value {
    match outcome {
        SubmitOutcome::Rejected { missing } => json!({ "status": "rejected", "missing": missing }),
        SubmitOutcome::Ignored => json!({ "status": "ignored" }),
        SubmitOutcome::Paid(success) => json!({
            "status": "paid",
            "paymentId": success.payment_id,
            "orderId": success.order_reference,
            "signature": success.signature,
        }),
        SubmitOutcome::Failed(err) => json!({
            "status": "failed",
            "kind": err.kind(),
            "message": err.user_message(),
            "retryable": err.is_retryable(),
        }),
    }
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
