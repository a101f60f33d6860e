//! # checkout-sim
//!
//! Drives the payment form end to end against a simulated Razorpay
//! widget, without a browser.
//!
//! ## Usage
//!
//! ```bash
//! export RAZORPAY_KEY_ID=rzp_test_...
//! export CHECKOUT_DISPLAY_NAME="Acme Store"
//!
//! # success | decline | double | offline | abandon
//! checkout-sim decline
//! ```
//!
//! The scenario may also come from `CHECKOUT_SIM_SCENARIO`.

mod sim;

use anyhow::Context;
use checkout_core::{
    CheckoutBridge, CheckoutSettings, LocalOrderReference, LogNotifier, PaymentForm, ScriptLoader,
    SubmitOutcome,
};
use checkout_razorpay::RazorpayConfig;
use futures::FutureExt;
use sim::{Scenario, SimulatedInjector, SimulatedSdk};
use std::env;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Deadline for the abandon scenario when `CHECKOUT_TIMEOUT_MS` is unset
const ABANDON_TIMEOUT_MS: u64 = 3_000;

/// How long the simulated user takes inside the widget
const WIDGET_DELAY: Duration = Duration::from_millis(400);

const SCRIPT_LATENCY: Duration = Duration::from_millis(150);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let scenario: Scenario = env::args()
        .nth(1)
        .or_else(|| env::var("CHECKOUT_SIM_SCENARIO").ok())
        .unwrap_or_else(|| "success".to_string())
        .parse()?;

    let razorpay = RazorpayConfig::from_env().context("loading Razorpay configuration")?;
    let mut settings = CheckoutSettings::from_env(razorpay.key_id.clone())
        .context("loading checkout settings")?;
    if scenario == Scenario::Abandon && settings.timeout_ms.is_none() {
        settings.timeout_ms = Some(ABANDON_TIMEOUT_MS);
    }

    info!("Scenario: {}", scenario.as_str());
    info!(
        "Mode: {}",
        if razorpay.is_live_mode() { "live" } else { "test" }
    );

    // Widget callbacks are !Send, so everything runs on one LocalSet.
    let local = tokio::task::LocalSet::new();
    let outcome = local.run_until(run(scenario, razorpay, settings)).await;

    match outcome {
        SubmitOutcome::Paid(success) => {
            info!("✅ Paid: {} (order {})", success.payment_id, success.order_reference);
        }
        SubmitOutcome::Failed(err) => {
            warn!("❌ {} ({})", err.user_message(), err.kind());
        }
        SubmitOutcome::Rejected { missing } => {
            warn!("Form rejected, missing: {}", missing.join(", "));
        }
        SubmitOutcome::Ignored => warn!("Submit ignored"),
    }

    Ok(())
}

async fn run(scenario: Scenario, razorpay: RazorpayConfig, settings: CheckoutSettings) -> SubmitOutcome {
    let timeout_ms = settings.timeout_ms;
    let loader = ScriptLoader::new(SimulatedInjector::new(scenario, SCRIPT_LATENCY));
    let bridge = CheckoutBridge::new(SimulatedSdk::new(razorpay, scenario, WIDGET_DELAY), loader);

    let mut form = PaymentForm::new(settings, bridge, LocalOrderReference::new(), LogNotifier)
        .on_success(|payment_id, order_id, signature| {
            info!(%payment_id, %order_id, %signature, "Forward to backend for verification");
        })
        .on_error(|err| {
            info!(payload = %err.payload(), "Payment error reported to host");
        });
    if let Some(ms) = timeout_ms {
        form = form.with_deadline(move || tokio::time::sleep(Duration::from_millis(ms)).boxed_local());
    }

    form.set_name(env::var("CHECKOUT_SIM_NAME").unwrap_or_else(|_| "Asha Rao".to_string()));
    form.set_email(env::var("CHECKOUT_SIM_EMAIL").unwrap_or_else(|_| "asha@example.com".to_string()));
    form.set_phone(env::var("CHECKOUT_SIM_PHONE").unwrap_or_else(|_| "9876543210".to_string()));

    info!("{}", form.button_label());
    form.submit().await
}

fn print_banner() {
    println!(
        r#"
  ⚡ Razorpay Checkout Simulator ⚡
  ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
