//! Low-level wasm-bindgen bindings to Razorpay Checkout (`checkout.js`).
//!
//! The `Razorpay` global only exists after the script has loaded; it is
//! resolved when the constructor is called, not when the module loads.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Raw Razorpay Checkout widget handle.
    #[wasm_bindgen(js_name = Razorpay)]
    #[derive(Debug, Clone)]
    pub type JsRazorpay;

    /// `new Razorpay(options)`; throws if `options` is malformed.
    #[wasm_bindgen(constructor, catch, js_class = "Razorpay")]
    pub fn new(options: &JsValue) -> Result<JsRazorpay, JsValue>;

    /// `rzp.open()` shows the checkout modal.
    #[wasm_bindgen(method, catch)]
    pub fn open(this: &JsRazorpay) -> Result<(), JsValue>;

    /// `rzp.on(event, callback)`
    #[wasm_bindgen(method)]
    pub fn on(this: &JsRazorpay, event: &str, callback: &js_sys::Function);
}

/// Best-effort message from a thrown JS value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
