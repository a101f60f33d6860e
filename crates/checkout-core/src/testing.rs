//! Scripted collaborators for unit tests.

use crate::bridge::{CheckoutSdk, CheckoutWidget, PayloadCallback, WidgetEvent};
use crate::error::{CheckoutError, CheckoutResult};
use crate::loader::ScriptInjector;
use crate::order_ref::OrderReferenceSource;
use crate::outcome::{PaymentFailure, PaymentSuccess};
use crate::session::SessionDescriptor;
use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub fn success_payload(payment_id: &str, order_id: &str, signature: &str) -> Value {
    json!({
        "payment_id": payment_id,
        "order_id": order_id,
        "signature": signature,
    })
}

pub fn failure_payload(description: &str) -> Value {
    json!({ "error": { "description": description, "code": "BAD_REQUEST_ERROR" } })
}

/// Resolves every injection immediately with a configurable result
pub struct InstantInjector {
    result: Cell<bool>,
    calls: Cell<usize>,
}

impl InstantInjector {
    pub fn new(result: bool) -> Self {
        Self {
            result: Cell::new(result),
            calls: Cell::new(0),
        }
    }

    pub fn set_result(&self, result: bool) {
        self.result.set(result);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl ScriptInjector for InstantInjector {
    async fn inject(&self, _url: &str) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.result.get()
    }
}

/// Holds every injection open until the test releases it
#[derive(Default)]
pub struct GatedInjector {
    gates: RefCell<Vec<oneshot::Sender<bool>>>,
    calls: Cell<usize>,
}

impl GatedInjector {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn open_all(&self, result: bool) {
        for gate in self.gates.borrow_mut().drain(..) {
            let _ = gate.send(result);
        }
    }
}

#[async_trait(?Send)]
impl ScriptInjector for GatedInjector {
    async fn inject(&self, _url: &str) -> bool {
        self.calls.set(self.calls.get() + 1);
        let (sender, receiver) = oneshot::channel();
        self.gates.borrow_mut().push(sender);
        receiver.await.unwrap_or(false)
    }
}

/// What the scripted widget does when opened
#[derive(Clone)]
pub enum WidgetScript {
    Succeed(Value),
    Fail(Value),
    /// Fires both channels, as a buggy SDK might
    Both {
        success_first: bool,
        success: Value,
        failure: Value,
    },
    /// Never fires on its own; see [`ScriptedSdk::fire_success`]
    Silent,
    DropCallbacks,
    OpenFails,
}

#[derive(Default)]
struct Handlers {
    success: RefCell<Option<Rc<PayloadCallback>>>,
    failure: RefCell<Option<Rc<PayloadCallback>>>,
}

pub struct ScriptedWidget {
    script: WidgetScript,
    handlers: Rc<Handlers>,
}

impl ScriptedWidget {
    fn fire(&self, success: bool, payload: Value) {
        let slot = if success {
            &self.handlers.success
        } else {
            &self.handlers.failure
        };
        let callback = slot.borrow().clone();
        if let Some(callback) = callback {
            (*callback)(payload);
        }
    }
}

impl CheckoutWidget for ScriptedWidget {
    fn on(&self, event: WidgetEvent, callback: PayloadCallback) {
        match event {
            WidgetEvent::PaymentFailed => {
                *self.handlers.failure.borrow_mut() = Some(Rc::new(callback));
            }
        }
    }

    fn open(&self) -> CheckoutResult<()> {
        match self.script.clone() {
            WidgetScript::Succeed(payload) => self.fire(true, payload),
            WidgetScript::Fail(payload) => self.fire(false, payload),
            WidgetScript::Both {
                success_first,
                success,
                failure,
            } => {
                if success_first {
                    self.fire(true, success);
                    self.fire(false, failure);
                } else {
                    self.fire(false, failure);
                    self.fire(true, success);
                }
            }
            WidgetScript::Silent => {}
            WidgetScript::DropCallbacks => {
                self.handlers.success.borrow_mut().take();
                self.handlers.failure.borrow_mut().take();
            }
            WidgetScript::OpenFails => {
                return Err(CheckoutError::Widget("open() threw".to_string()));
            }
        }
        Ok(())
    }
}

/// Fake SDK whose widgets follow a [`WidgetScript`]
pub struct ScriptedSdk {
    script: WidgetScript,
    constructed: Cell<usize>,
    last_session: RefCell<Option<SessionDescriptor>>,
    last_handlers: RefCell<Option<Rc<Handlers>>>,
}

impl ScriptedSdk {
    pub fn new(script: WidgetScript) -> Self {
        Self {
            script,
            constructed: Cell::new(0),
            last_session: RefCell::new(None),
            last_handlers: RefCell::new(None),
        }
    }

    pub fn constructed(&self) -> usize {
        self.constructed.get()
    }

    pub fn last_session(&self) -> Option<SessionDescriptor> {
        self.last_session.borrow().clone()
    }

    /// Invoke the last silent widget's success handler, if any
    pub fn fire_success(&self, payload: Value) -> bool {
        let handlers = self.last_handlers.borrow().clone();
        let callback = handlers.and_then(|h| h.success.borrow().clone());
        match callback {
            Some(callback) => {
                (*callback)(payload);
                true
            }
            None => false,
        }
    }
}

impl CheckoutSdk for ScriptedSdk {
    type Widget = ScriptedWidget;

    fn script_url(&self) -> &str {
        "https://checkout.example.com/v1/checkout.js"
    }

    fn construct(
        &self,
        session: &SessionDescriptor,
        handler: PayloadCallback,
    ) -> CheckoutResult<ScriptedWidget> {
        self.constructed.set(self.constructed.get() + 1);
        *self.last_session.borrow_mut() = Some(session.clone());

        let handlers = Rc::new(Handlers::default());
        *handlers.success.borrow_mut() = Some(Rc::new(handler));
        if matches!(self.script, WidgetScript::Silent) {
            *self.last_handlers.borrow_mut() = Some(Rc::clone(&handlers));
        }

        Ok(ScriptedWidget {
            script: self.script.clone(),
            handlers,
        })
    }

    fn decode_success(&self, payload: &Value) -> CheckoutResult<PaymentSuccess> {
        let field = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| CheckoutError::Widget(format!("missing {}", name)))
        };
        Ok(PaymentSuccess::new(
            field("payment_id")?,
            field("order_id")?,
            field("signature")?,
        ))
    }

    fn decode_failure(&self, payload: &Value) -> PaymentFailure {
        let error = payload.get("error").cloned().unwrap_or(Value::Null);
        let reason = error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        PaymentFailure::new(reason).with_raw(error)
    }
}

/// Always returns the same reference
pub struct FixedOrderReference(pub String);

#[async_trait(?Send)]
impl OrderReferenceSource for FixedOrderReference {
    async fn create_order_reference(&self, _amount_minor: i64) -> CheckoutResult<String> {
        Ok(self.0.clone())
    }
}

/// Simulates an unreachable order backend
pub struct UnreachableOrderBackend;

#[async_trait(?Send)]
impl OrderReferenceSource for UnreachableOrderBackend {
    async fn create_order_reference(&self, _amount_minor: i64) -> CheckoutResult<String> {
        Err(CheckoutError::BackendUnavailable(
            "order service unreachable".to_string(),
        ))
    }
}
