//! # Payment Form Coordinator
//!
//! Owns the payment form's state and runs one checkout attempt per
//! submit.
//!
//! ```text
//!          submit (fields ok)
//!   Idle ────────────────────► Submitting
//!    ▲                             │
//!    └──── success | failure ──────┘   (one notification + one callback)
//! ```
//!
//! Submits while an attempt is in flight are ignored. Every failure,
//! whatever its kind, returns the form to idle so the user can retry.

use crate::bridge::{CheckoutBridge, CheckoutSdk};
use crate::checkout::Prefill;
use crate::error::{CheckoutError, CheckoutResult};
use crate::money::{format_major, parse_major_input};
use crate::notify::{Notification, Notifier};
use crate::order_ref::OrderReferenceSource;
use crate::outcome::PaymentSuccess;
use crate::settings::CheckoutSettings;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Invoked with `(payment_id, order_reference, signature)`
pub type SuccessCallback = Box<dyn Fn(&str, &str, &str)>;

/// Invoked with the failure; use [`CheckoutError::payload`] for the raw
/// provider error
pub type ErrorCallback = Box<dyn Fn(&CheckoutError)>;

/// Produces a fresh deadline future for each attempt
pub type DeadlineFactory = Box<dyn Fn() -> LocalBoxFuture<'static, ()>>;

/// UI-visible form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Always non-negative, in minor units
    pub amount_minor: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_submitting: bool,
}

impl FormState {
    /// Required fields that are blank, in display order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    fn prefill(&self) -> Prefill {
        Prefill::new(self.name.trim(), self.email.trim(), self.phone.trim())
    }
}

/// Result of one `submit` call
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Required fields were blank; nothing was started
    Rejected { missing: Vec<&'static str> },
    /// An attempt was already in flight
    Ignored,
    Paid(PaymentSuccess),
    Failed(CheckoutError),
}

/// The payment form
pub struct PaymentForm<S, O, N> {
    settings: CheckoutSettings,
    bridge: CheckoutBridge<S>,
    orders: O,
    notifier: N,
    state: RefCell<FormState>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    deadline: Option<DeadlineFactory>,
}

impl<S, O, N> PaymentForm<S, O, N>
where
    S: CheckoutSdk + 'static,
    O: OrderReferenceSource,
    N: Notifier,
{
    pub fn new(settings: CheckoutSettings, bridge: CheckoutBridge<S>, orders: O, notifier: N) -> Self {
        let state = FormState {
            amount_minor: settings.default_amount_minor.max(0),
            ..FormState::default()
        };
        Self {
            settings,
            bridge,
            orders,
            notifier,
            state: RefCell::new(state),
            on_success: None,
            on_error: None,
            deadline: None,
        }
    }

    pub fn on_success(mut self, callback: impl Fn(&str, &str, &str) + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&CheckoutError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Bound every attempt by a caller-supplied timer
    pub fn with_deadline(mut self, factory: impl Fn() -> LocalBoxFuture<'static, ()> + 'static) -> Self {
        self.deadline = Some(Box::new(factory));
        self
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    pub fn bridge(&self) -> &CheckoutBridge<S> {
        &self.bridge
    }

    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().is_submitting
    }

    /// Amount field input, in major units as typed by the user
    pub fn set_amount_major(&self, input: &str) {
        self.state.borrow_mut().amount_minor = parse_major_input(input);
    }

    pub fn set_amount_minor(&self, amount_minor: i64) {
        self.state.borrow_mut().amount_minor = amount_minor.max(0);
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.state.borrow_mut().name = name.into();
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.state.borrow_mut().email = email.into();
    }

    pub fn set_phone(&self, phone: impl Into<String>) {
        self.state.borrow_mut().phone = phone.into();
    }

    /// Amount in major units for display (e.g. "₹1000")
    pub fn amount_display(&self) -> String {
        format_major(self.state.borrow().amount_minor, &self.settings.currency)
    }

    pub fn button_label(&self) -> String {
        if self.is_submitting() {
            "Processing...".to_string()
        } else {
            format!("Pay {}", self.amount_display())
        }
    }

    /// Validate the form and run one checkout attempt
    pub async fn submit(&self) -> SubmitOutcome {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            if state.is_submitting {
                debug!("Submit ignored: checkout already in progress");
                return SubmitOutcome::Ignored;
            }
            let missing = state.missing_fields();
            if !missing.is_empty() {
                drop(state);
                debug!(?missing, "Submit rejected: required fields blank");
                self.notifier.notify(Notification::destructive(
                    "Missing information",
                    "Please fill in all required fields",
                ));
                return SubmitOutcome::Rejected { missing };
            }
            state.is_submitting = true;
            state.clone()
        };

        let result = self.run_attempt(&snapshot, Uuid::new_v4()).await;
        self.state.borrow_mut().is_submitting = false;

        match result {
            Ok(success) => {
                self.notifier.notify(Notification::info(
                    "Payment Successful",
                    format!("Payment ID: {}", success.payment_id),
                ));
                if let Some(ref callback) = self.on_success {
                    callback(&success.payment_id, &success.order_reference, &success.signature);
                }
                SubmitOutcome::Paid(success)
            }
            Err(err) => {
                self.notifier
                    .notify(Notification::destructive("Payment Failed", err.user_message()));
                if let Some(ref callback) = self.on_error {
                    callback(&err);
                }
                SubmitOutcome::Failed(err)
            }
        }
    }

    #[instrument(skip(self, form, attempt), fields(attempt = %attempt, amount_minor = form.amount_minor))]
    async fn run_attempt(&self, form: &FormState, attempt: Uuid) -> CheckoutResult<PaymentSuccess> {
        let order_reference = self
            .orders
            .create_order_reference(form.amount_minor)
            .await?;

        let config = self
            .settings
            .checkout_config(form.amount_minor, order_reference, form.prefill());

        let result = match self.deadline {
            Some(ref factory) => {
                self.bridge
                    .open_checkout_with_deadline(&config, factory())
                    .await
            }
            None => self.bridge.open_checkout(&config).await,
        };

        match &result {
            Ok(success) => info!(payment_id = %success.payment_id, "Payment completed"),
            Err(err) => error!(kind = err.kind(), error = %err, "Payment failed"),
        }
        result
    }
}
