//! # Checkout Bridge
//!
//! Opens the external checkout widget and turns its two independent
//! callback channels into one awaitable result.
//!
//! ```text
//! open_checkout(config)
//!   ├─ ScriptLoader::ensure_loaded(sdk.script_url())   false ─► SdkUnavailable
//!   ├─ build_session(config)                           err   ─► Validation
//!   ├─ sdk.construct(session, handler)  ─┐
//!   ├─ widget.on(PaymentFailed, ...)    ─┴─► Settlement (first wins)
//!   ├─ widget.open()
//!   └─ await settlement | deadline      deadline ─► Timeout
//! ```

use crate::checkout::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::loader::ScriptLoader;
use crate::outcome::{CheckoutOutcome, PaymentFailure, PaymentSuccess};
use crate::session::{build_session, SessionDescriptor};
use crate::settlement::{settlement, SettleHandle};
use futures::future::{self, Either};
use serde_json::Value;
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// Callback the widget invokes with a raw JSON payload
pub type PayloadCallback = Box<dyn Fn(Value)>;

/// Widget events the bridge subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The provider reports a failed payment (decline, cancellation)
    PaymentFailed,
}

/// A constructed, not yet necessarily open, checkout widget
pub trait CheckoutWidget {
    /// Subscribe to a widget event
    fn on(&self, event: WidgetEvent, callback: PayloadCallback);

    /// Show the widget. Completion is reported through the callbacks.
    fn open(&self) -> CheckoutResult<()>;
}

/// The external checkout SDK boundary
pub trait CheckoutSdk {
    type Widget: CheckoutWidget;

    /// Script that must be loaded before [`construct`](Self::construct) works
    fn script_url(&self) -> &str;

    /// Build a widget from a session; `handler` receives the success payload
    fn construct(
        &self,
        session: &SessionDescriptor,
        handler: PayloadCallback,
    ) -> CheckoutResult<Self::Widget>;

    /// Extract payment identifiers from a success payload
    fn decode_success(&self, payload: &Value) -> CheckoutResult<PaymentSuccess>;

    /// Extract the failure from a failure-event payload
    fn decode_failure(&self, payload: &Value) -> PaymentFailure;
}

/// Drives one widget per checkout attempt
pub struct CheckoutBridge<S> {
    sdk: Rc<S>,
    loader: ScriptLoader,
}

impl<S: CheckoutSdk + 'static> CheckoutBridge<S> {
    pub fn new(sdk: S, loader: ScriptLoader) -> Self {
        Self {
            sdk: Rc::new(sdk),
            loader,
        }
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn loader(&self) -> &ScriptLoader {
        &self.loader
    }

    /// Open the widget and wait, without limit, for its outcome
    pub async fn open_checkout(&self, config: &CheckoutConfig) -> CheckoutResult<PaymentSuccess> {
        self.open_checkout_with_deadline(config, future::pending())
            .await
    }

    /// Open the widget and wait for its outcome or `deadline`, whichever
    /// comes first.
    ///
    /// On timeout the widget stays open but anything it reports later is
    /// ignored.
    #[instrument(
        skip(self, config, deadline),
        fields(order_reference = %config.order_reference, amount_minor = config.amount_minor)
    )]
    pub async fn open_checkout_with_deadline<D>(
        &self,
        config: &CheckoutConfig,
        deadline: D,
    ) -> CheckoutResult<PaymentSuccess>
    where
        D: Future<Output = ()>,
    {
        let url = self.sdk.script_url().to_string();
        if !self.loader.ensure_loaded(&url).await {
            return Err(CheckoutError::SdkUnavailable { url });
        }

        let session = build_session(config)?;

        let (handle, outcome) = settlement::<CheckoutOutcome>();
        let closer = handle.downgrade();

        let widget = self
            .sdk
            .construct(&session, self.success_handler(handle.clone()))?;
        widget.on(WidgetEvent::PaymentFailed, self.failure_handler(handle));

        debug!("Opening checkout widget");
        if let Err(err) = widget.open() {
            closer.close();
            return Err(err);
        }

        futures::pin_mut!(deadline);
        let settled = match future::select(outcome, deadline).await {
            Either::Left((Ok(outcome), _)) => outcome,
            Either::Left((Err(_canceled), _)) => {
                return Err(CheckoutError::Widget(
                    "widget released its callbacks without reporting an outcome".to_string(),
                ));
            }
            Either::Right(((), _)) => {
                closer.close();
                warn!("Checkout deadline passed before the widget settled");
                return Err(CheckoutError::Timeout);
            }
        };
        // The widget owns the callbacks; keep it alive until settled.
        drop(widget);

        info!(outcome = settled.label(), "Checkout settled");
        match settled {
            CheckoutOutcome::Success(success) => Ok(success),
            CheckoutOutcome::Failure(failure) => Err(CheckoutError::Failure(failure)),
        }
    }

    fn success_handler(&self, handle: SettleHandle<CheckoutOutcome>) -> PayloadCallback {
        let sdk = Rc::clone(&self.sdk);
        Box::new(move |payload: Value| {
            let outcome = match sdk.decode_success(&payload) {
                Ok(success) => CheckoutOutcome::Success(success),
                Err(err) => {
                    warn!(error = %err, "Undecodable success payload");
                    CheckoutOutcome::Failure(PaymentFailure::new(err.user_message()).with_raw(payload))
                }
            };
            settle_once(&handle, outcome);
        })
    }

    fn failure_handler(&self, handle: SettleHandle<CheckoutOutcome>) -> PayloadCallback {
        let sdk = Rc::clone(&self.sdk);
        Box::new(move |payload: Value| {
            let failure = sdk.decode_failure(&payload);
            settle_once(&handle, CheckoutOutcome::Failure(failure));
        })
    }
}

fn settle_once(handle: &SettleHandle<CheckoutOutcome>, outcome: CheckoutOutcome) {
    let label = outcome.label();
    if !handle.settle(outcome) {
        warn!(ignored = label, "Checkout already settled; ignoring late widget event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{failure_payload, success_payload, InstantInjector, ScriptedSdk, WidgetScript};
    use std::time::Duration;

    fn config() -> CheckoutConfig {
        CheckoutConfig::new("rzp_test_key", 100000, "INR", "Acme", "order_42")
    }

    fn bridge(script: WidgetScript, script_loads: bool) -> CheckoutBridge<ScriptedSdk> {
        let loader = ScriptLoader::new(InstantInjector::new(script_loads));
        CheckoutBridge::new(ScriptedSdk::new(script), loader)
    }

    #[tokio::test]
    async fn test_success_resolves_with_payload_ids() {
        let bridge = bridge(WidgetScript::Succeed(success_payload("pay_123", "order_42", "sig_abc")), true);

        let success = bridge.open_checkout(&config()).await.unwrap();
        assert_eq!(success, PaymentSuccess::new("pay_123", "order_42", "sig_abc"));
        assert_eq!(bridge.sdk().constructed(), 1);
        assert_eq!(bridge.sdk().last_session().unwrap().amount, 100000);
    }

    #[tokio::test]
    async fn test_sdk_unavailable_never_constructs_widget() {
        let bridge = bridge(WidgetScript::Succeed(success_payload("pay_1", "o", "s")), false);

        let err = bridge.open_checkout(&config()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::SdkUnavailable { .. }));
        assert_eq!(bridge.sdk().constructed(), 0);
    }

    #[tokio::test]
    async fn test_validation_error_propagates_unchanged() {
        let bridge = bridge(WidgetScript::Silent, true);
        let mut cfg = config();
        cfg.amount_minor = -5;

        let err = bridge.open_checkout(&cfg).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(bridge.sdk().constructed(), 0);
    }

    #[tokio::test]
    async fn test_failure_event_rejects_with_reason() {
        let bridge = bridge(WidgetScript::Fail(failure_payload("card declined")), true);

        match bridge.open_checkout(&config()).await {
            Err(CheckoutError::Failure(failure)) => {
                assert_eq!(failure.reason, "card declined");
                assert_eq!(failure.raw["description"], "card declined");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_then_failure_settles_once_with_success() {
        let bridge = bridge(
            WidgetScript::Both {
                success_first: true,
                success: success_payload("pay_1", "order_42", "sig"),
                failure: failure_payload("late failure"),
            },
            true,
        );

        let success = bridge.open_checkout(&config()).await.unwrap();
        assert_eq!(success.payment_id, "pay_1");
    }

    #[tokio::test]
    async fn test_failure_then_success_settles_once_with_failure() {
        let bridge = bridge(
            WidgetScript::Both {
                success_first: false,
                success: success_payload("pay_1", "order_42", "sig"),
                failure: failure_payload("card declined"),
            },
            true,
        );

        let err = bridge.open_checkout(&config()).await.unwrap_err();
        assert_eq!(err.user_message(), "card declined");
    }

    #[tokio::test]
    async fn test_undecodable_success_becomes_failure() {
        let bridge = bridge(WidgetScript::Succeed(serde_json::json!({ "unexpected": true })), true);

        let err = bridge.open_checkout(&config()).await.unwrap_err();
        match err {
            CheckoutError::Failure(failure) => assert_eq!(failure.raw["unexpected"], true),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_widget_dropping_callbacks_is_reported() {
        let bridge = bridge(WidgetScript::DropCallbacks, true);

        let err = bridge.open_checkout(&config()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Widget(_)));
    }

    #[tokio::test]
    async fn test_open_error_is_returned() {
        let bridge = bridge(WidgetScript::OpenFails, true);

        let err = bridge.open_checkout(&config()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Widget(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_times_out_and_ignores_late_success() {
        let bridge = bridge(WidgetScript::Silent, true);

        let err = bridge
            .open_checkout_with_deadline(&config(), tokio::time::sleep(Duration::from_secs(30)))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Timeout));

        // The widget is still up; a late completion reaches a closed slot.
        assert!(bridge.sdk().fire_success(success_payload("pay_late", "order_42", "sig")));
    }
}
