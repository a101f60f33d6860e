//! `CheckoutSdk` implementation over `window.Razorpay`.

use crate::bindings::{js_error_message, JsRazorpay};
use checkout_core::{
    CheckoutError, CheckoutResult, CheckoutSdk, CheckoutWidget, PayloadCallback, PaymentFailure,
    PaymentSuccess, SessionDescriptor, WidgetEvent,
};
use checkout_razorpay::{decode_failure, decode_success, event_name, RazorpayConfig};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Convert a JS callback argument into JSON
pub(crate) fn js_to_json(value: JsValue) -> Value {
    serde_wasm_bindgen::from_value(value).unwrap_or(Value::Null)
}

/// Serialize into a plain JS object (maps as objects, not `Map`)
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// Razorpay Checkout as loaded in the page
pub struct RazorpayJsSdk {
    config: RazorpayConfig,
}

impl RazorpayJsSdk {
    pub fn new(config: RazorpayConfig) -> Self {
        Self { config }
    }
}

/// A constructed `Razorpay` instance.
///
/// Callbacks are handed to JS with `into_js_value`: the modal can outlive
/// the attempt (a retry inside it may still report), so the Rust side
/// must not free them when the bridge drops the widget.
pub struct JsRazorpayWidget {
    inner: JsRazorpay,
}

impl CheckoutWidget for JsRazorpayWidget {
    fn on(&self, event: WidgetEvent, callback: PayloadCallback) {
        let listener = Closure::<dyn Fn(JsValue)>::new(move |response: JsValue| {
            callback(js_to_json(response))
        });
        self.inner
            .on(event_name(event), listener.into_js_value().unchecked_ref());
    }

    fn open(&self) -> CheckoutResult<()> {
        self.inner
            .open()
            .map_err(|e| CheckoutError::Widget(js_error_message(&e)))
    }
}

impl CheckoutSdk for RazorpayJsSdk {
    type Widget = JsRazorpayWidget;

    fn script_url(&self) -> &str {
        &self.config.script_url
    }

    fn construct(
        &self,
        session: &SessionDescriptor,
        handler: PayloadCallback,
    ) -> CheckoutResult<JsRazorpayWidget> {
        let options = to_js(session).map_err(|e| {
            CheckoutError::Widget(format!("Failed to build checkout options: {}", js_error_message(&e)))
        })?;

        let handler = Closure::<dyn Fn(JsValue)>::new(move |response: JsValue| {
            handler(js_to_json(response))
        });
        js_sys::Reflect::set(&options, &JsValue::from_str("handler"), &handler.into_js_value())
            .map_err(|e| CheckoutError::Widget(js_error_message(&e)))?;

        let inner = JsRazorpay::new(&options)
            .map_err(|e| CheckoutError::Widget(js_error_message(&e)))?;

        Ok(JsRazorpayWidget { inner })
    }

    fn decode_success(&self, payload: &Value) -> CheckoutResult<PaymentSuccess> {
        decode_success(payload)
    }

    fn decode_failure(&self, payload: &Value) -> PaymentFailure {
        decode_failure(payload)
    }
}
