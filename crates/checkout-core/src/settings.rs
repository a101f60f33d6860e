//! # Checkout Settings
//!
//! Static configuration for the payment form: merchant key, default
//! amount, currency and widget branding. Loaded from environment
//! variables, a TOML file, or (in the browser) a JS object.

use crate::checkout::{CheckoutConfig, Prefill};
use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_AMOUNT_MINOR: i64 = 100_000;
pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_DISPLAY_NAME: &str = "Your Company Name";
pub const DEFAULT_DESCRIPTION: &str = "Purchase Description";
pub const DEFAULT_THEME_COLOR: &str = "#3730a3";

/// Payment form configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Publishable merchant key
    pub merchant_key: String,

    /// Amount the form starts with, in minor units
    #[serde(default = "default_amount")]
    pub default_amount_minor: i64,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Merchant name shown in the widget
    #[serde(default = "default_display_name")]
    pub display_name: String,

    #[serde(default = "default_description")]
    pub description: Option<String>,

    #[serde(default = "default_theme_color")]
    pub theme_color: Option<String>,

    /// Give up waiting for the widget after this long (no limit if unset)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_amount() -> i64 {
    DEFAULT_AMOUNT_MINOR
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_display_name() -> String {
    DEFAULT_DISPLAY_NAME.to_string()
}

fn default_description() -> Option<String> {
    Some(DEFAULT_DESCRIPTION.to_string())
}

fn default_theme_color() -> Option<String> {
    Some(DEFAULT_THEME_COLOR.to_string())
}

impl CheckoutSettings {
    /// Settings with defaults for everything but the merchant key
    pub fn new(merchant_key: impl Into<String>) -> Self {
        Self {
            merchant_key: merchant_key.into(),
            default_amount_minor: DEFAULT_AMOUNT_MINOR,
            currency: default_currency(),
            display_name: default_display_name(),
            description: default_description(),
            theme_color: default_theme_color(),
            timeout_ms: None,
        }
    }

    /// Load from environment variables.
    ///
    /// Optional env vars:
    /// - `CHECKOUT_DEFAULT_AMOUNT` (minor units)
    /// - `CHECKOUT_CURRENCY`
    /// - `CHECKOUT_DISPLAY_NAME`
    /// - `CHECKOUT_DESCRIPTION`
    /// - `CHECKOUT_THEME_COLOR`
    /// - `CHECKOUT_TIMEOUT_MS`
    pub fn from_env(merchant_key: impl Into<String>) -> CheckoutResult<Self> {
        dotenvy::dotenv().ok();

        let mut settings = Self::new(merchant_key);

        if let Ok(amount) = env::var("CHECKOUT_DEFAULT_AMOUNT") {
            settings.default_amount_minor = amount.trim().parse().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "CHECKOUT_DEFAULT_AMOUNT must be an integer, got {:?}",
                    amount
                ))
            })?;
        }
        if let Ok(currency) = env::var("CHECKOUT_CURRENCY") {
            settings.currency = currency;
        }
        if let Ok(name) = env::var("CHECKOUT_DISPLAY_NAME") {
            settings.display_name = name;
        }
        if let Ok(description) = env::var("CHECKOUT_DESCRIPTION") {
            settings.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Ok(color) = env::var("CHECKOUT_THEME_COLOR") {
            settings.theme_color = Some(color).filter(|c| !c.is_empty());
        }
        settings.timeout_ms = env::var("CHECKOUT_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.trim().parse().ok());

        settings.validate()?;
        Ok(settings)
    }

    /// Parse from TOML
    pub fn from_toml_str(content: &str) -> CheckoutResult<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| CheckoutError::Configuration(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> CheckoutResult<()> {
        if self.merchant_key.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "merchant key is required".to_string(),
            ));
        }
        if self.default_amount_minor < 0 {
            return Err(CheckoutError::Configuration(
                "default amount must be non-negative".to_string(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "currency code is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the per-attempt config for one checkout
    pub fn checkout_config(
        &self,
        amount_minor: i64,
        order_reference: impl Into<String>,
        prefill: Prefill,
    ) -> CheckoutConfig {
        let mut config = CheckoutConfig::new(
            self.merchant_key.clone(),
            amount_minor,
            self.currency.clone(),
            self.display_name.clone(),
            order_reference,
        )
        .with_prefill(prefill);

        if let Some(ref description) = self.description {
            config = config.with_description(description.clone());
        }
        if let Some(ref color) = self.theme_color {
            config = config.with_theme_color(color.clone());
        }
        config
    }
}
