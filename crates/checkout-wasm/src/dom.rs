//! Browser-side collaborators: script insertion and timers.

use async_trait::async_trait;
use checkout_core::ScriptInjector;
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlScriptElement, Node};

/// Inserts `<script async src=...>` into the document head
#[derive(Debug, Default, Clone, Copy)]
pub struct DomScriptInjector;

#[async_trait(?Send)]
impl ScriptInjector for DomScriptInjector {
    async fn inject(&self, url: &str) -> bool {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return false;
        };

        let script: HtmlScriptElement = match document
            .create_element("script")
            .ok()
            .and_then(|el| el.dyn_into().ok())
        {
            Some(script) => script,
            None => return false,
        };
        script.set_src(url);
        script.set_async(true);

        let (sender, receiver) = oneshot::channel::<bool>();
        let sender = Rc::new(RefCell::new(Some(sender)));
        let on_load = settle_closure(Rc::clone(&sender), true);
        let on_error = settle_closure(sender, false);
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let parent: Node = match (document.head(), document.body()) {
            (Some(head), _) => head.unchecked_into(),
            (None, Some(body)) => body.unchecked_into(),
            (None, None) => return false,
        };
        if parent.append_child(&script).is_err() {
            return false;
        }

        let loaded = receiver.await.unwrap_or(false);
        script.set_onload(None);
        script.set_onerror(None);
        loaded
    }
}

fn settle_closure(sender: Rc<RefCell<Option<oneshot::Sender<bool>>>>, loaded: bool) -> Closure<dyn FnMut()> {
    Closure::new(move || {
        if let Some(sender) = sender.borrow_mut().take() {
            let _ = sender.send(loaded);
        }
    })
}

/// Future resolving after `ms` milliseconds via `setTimeout`
pub fn sleep_ms(ms: u32) -> LocalBoxFuture<'static, ()> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
        }
    });
    async move {
        let _ = JsFuture::from(promise).await;
    }
    .boxed_local()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_sleep_resolves() {
        sleep_ms(5).await;
    }

    #[wasm_bindgen_test]
    async fn test_unreachable_script_reports_failure() {
        assert!(!DomScriptInjector.inject("http://127.0.0.1:9/missing.js").await);
    }
}
