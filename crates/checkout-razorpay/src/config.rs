//! # Razorpay Configuration
//!
//! Publishable key and script location for Razorpay Checkout.
//! Only the key id lives in the browser; the key secret never does.

use crate::RAZORPAY_SCRIPT_URL;
use checkout_core::CheckoutError;
use std::env;

/// Razorpay Checkout configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RazorpayConfig {
    /// Key id (rzp_test_... or rzp_live_...)
    pub key_id: String,

    /// Checkout script URL (overridable for testing/mirrors)
    pub script_url: String,
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `RAZORPAY_KEY_ID`
    ///
    /// Optional:
    /// - `RAZORPAY_SCRIPT_URL`
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let key_id = env::var("RAZORPAY_KEY_ID").map_err(|_| {
            CheckoutError::Configuration("RAZORPAY_KEY_ID not set".to_string())
        })?;

        let mut config = Self::new(key_id);
        if let Ok(url) = env::var("RAZORPAY_SCRIPT_URL") {
            config = config.with_script_url(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Create config with an explicit key id
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            script_url: RAZORPAY_SCRIPT_URL.to_string(),
        }
    }

    /// Validate key format
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if !self.key_id.starts_with("rzp_test_") && !self.key_id.starts_with("rzp_live_") {
            return Err(CheckoutError::Configuration(
                "RAZORPAY_KEY_ID must start with rzp_test_ or rzp_live_".to_string(),
            ));
        }
        if self.script_url.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "Razorpay script URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.key_id.starts_with("rzp_live_")
    }

    /// Builder: set custom script URL
    pub fn with_script_url(mut self, url: impl Into<String>) -> Self {
        self.script_url = url.into();
        self
    }
}
