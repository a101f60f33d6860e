//! # Simulated Razorpay Checkout
//!
//! A stand-in for `checkout.js` that settles after a short delay
//! according to a [`Scenario`]. Payloads use Razorpay's wire shape and
//! are decoded by `checkout-razorpay`, so the whole path past the
//! browser boundary is exercised.

use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, CheckoutSdk, CheckoutWidget, PayloadCallback, PaymentFailure,
    PaymentSuccess, ScriptInjector, SessionDescriptor, WidgetEvent,
};
use checkout_razorpay::{decode_failure, decode_success, event_name, RazorpayConfig};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// How the simulated widget behaves once opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Payment completes
    Success,
    /// Card declined via `payment.failed`
    Decline,
    /// Buggy SDK: fails, then also reports success
    Double,
    /// `checkout.js` never loads
    Offline,
    /// User walks away; nothing is reported
    Abandon,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Success => "success",
            Scenario::Decline => "decline",
            Scenario::Double => "double",
            Scenario::Offline => "offline",
            Scenario::Abandon => "abandon",
        }
    }
}

impl FromStr for Scenario {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(Scenario::Success),
            "decline" => Ok(Scenario::Decline),
            "double" => Ok(Scenario::Double),
            "offline" => Ok(Scenario::Offline),
            "abandon" => Ok(Scenario::Abandon),
            other => Err(anyhow::anyhow!(
                "unknown scenario {:?} (expected success, decline, double, offline or abandon)",
                other
            )),
        }
    }
}

/// Pretends to fetch `checkout.js`
pub struct SimulatedInjector {
    scenario: Scenario,
    latency: Duration,
}

impl SimulatedInjector {
    pub fn new(scenario: Scenario, latency: Duration) -> Self {
        Self { scenario, latency }
    }
}

#[async_trait(?Send)]
impl ScriptInjector for SimulatedInjector {
    async fn inject(&self, url: &str) -> bool {
        debug!(%url, "Simulating script fetch");
        tokio::time::sleep(self.latency).await;
        self.scenario != Scenario::Offline
    }
}

#[derive(Default)]
struct Callbacks {
    handler: Option<Rc<PayloadCallback>>,
    failed: Vec<Rc<PayloadCallback>>,
}

pub struct SimulatedWidget {
    scenario: Scenario,
    delay: Duration,
    order_id: String,
    callbacks: Rc<RefCell<Callbacks>>,
}

impl CheckoutWidget for SimulatedWidget {
    fn on(&self, event: WidgetEvent, callback: PayloadCallback) {
        debug!(event = event_name(event), "Widget subscription");
        match event {
            WidgetEvent::PaymentFailed => self.callbacks.borrow_mut().failed.push(Rc::new(callback)),
        }
    }

    fn open(&self) -> CheckoutResult<()> {
        info!(scenario = self.scenario.as_str(), "Simulated checkout opened");

        let callbacks = Rc::clone(&self.callbacks);
        let scenario = self.scenario;
        let delay = self.delay;
        let order_id = self.order_id.clone();

        // Requires a LocalSet, as the browser event loop would provide.
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            let (handler, failed) = {
                let callbacks = callbacks.borrow();
                (callbacks.handler.clone(), callbacks.failed.clone())
            };
            let succeed = || {
                if let Some(ref handler) = handler {
                    (**handler)(handler_response(&order_id));
                }
            };
            let fail = || {
                for callback in &failed {
                    (**callback)(declined_event());
                }
            };
            match scenario {
                Scenario::Success => succeed(),
                Scenario::Decline => fail(),
                Scenario::Double => {
                    fail();
                    succeed();
                }
                Scenario::Offline | Scenario::Abandon => {}
            }
        });
        Ok(())
    }
}

/// `CheckoutSdk` whose widgets follow a scenario
pub struct SimulatedSdk {
    config: RazorpayConfig,
    scenario: Scenario,
    delay: Duration,
}

impl SimulatedSdk {
    pub fn new(config: RazorpayConfig, scenario: Scenario, delay: Duration) -> Self {
        Self {
            config,
            scenario,
            delay,
        }
    }
}

impl CheckoutSdk for SimulatedSdk {
    type Widget = SimulatedWidget;

    fn script_url(&self) -> &str {
        &self.config.script_url
    }

    fn construct(
        &self,
        session: &SessionDescriptor,
        handler: PayloadCallback,
    ) -> CheckoutResult<SimulatedWidget> {
        if session.key != self.config.key_id {
            return Err(CheckoutError::Widget(
                "session key does not match the configured key id".to_string(),
            ));
        }
        debug!(options = %session.to_json(), "new Razorpay(options)");

        let callbacks = Callbacks {
            handler: Some(Rc::new(handler)),
            failed: Vec::new(),
        };
        Ok(SimulatedWidget {
            scenario: self.scenario,
            delay: self.delay,
            order_id: session.order_id.clone(),
            callbacks: Rc::new(RefCell::new(callbacks)),
        })
    }

    fn decode_success(&self, payload: &Value) -> CheckoutResult<PaymentSuccess> {
        decode_success(payload)
    }

    fn decode_failure(&self, payload: &Value) -> PaymentFailure {
        decode_failure(payload)
    }
}

fn handler_response(order_id: &str) -> Value {
    json!({
        "razorpay_payment_id": "pay_sim_0001",
        "razorpay_order_id": order_id,
        "razorpay_signature": "sig_sim_0001",
    })
}

fn declined_event() -> Value {
    json!({
        "error": {
            "code": "BAD_REQUEST_ERROR",
            "description": "Your payment has been declined by the bank",
            "source": "bank",
            "step": "payment_authorization",
            "reason": "payment_declined",
        }
    })
}
