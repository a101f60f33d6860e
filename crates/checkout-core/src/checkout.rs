//! # Checkout Configuration
//!
//! Per-attempt parameters handed to the checkout bridge. A fresh
//! `CheckoutConfig` is built for every attempt and never mutated after
//! it is handed over.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payer identity prefilled into the widget
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Prefill {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            contact: Some(contact.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.contact.is_none()
    }
}

/// Everything needed to open one checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Publishable merchant key (e.g. `rzp_test_...`)
    pub merchant_key: String,

    /// Amount in minor units (paise for INR)
    pub amount_minor: i64,

    /// ISO 4217 currency code
    pub currency: String,

    /// Merchant name shown in the widget header
    pub display_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Order reference from the order backend (or the local stub)
    pub order_reference: String,

    #[serde(default)]
    pub prefill: Prefill,

    /// Widget accent color (e.g. "#3730a3")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,

    /// Free-form metadata forwarded to the provider
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notes: BTreeMap<String, String>,
}

impl CheckoutConfig {
    pub fn new(
        merchant_key: impl Into<String>,
        amount_minor: i64,
        currency: impl Into<String>,
        display_name: impl Into<String>,
        order_reference: impl Into<String>,
    ) -> Self {
        Self {
            merchant_key: merchant_key.into(),
            amount_minor,
            currency: currency.into(),
            display_name: display_name.into(),
            description: None,
            order_reference: order_reference.into(),
            prefill: Prefill::default(),
            theme_color: None,
            notes: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_prefill(mut self, prefill: Prefill) -> Self {
        self.prefill = prefill;
        self
    }

    pub fn with_theme_color(mut self, color: impl Into<String>) -> Self {
        self.theme_color = Some(color.into());
        self
    }

    pub fn with_note(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.notes.insert(key.into(), value.into());
        self
    }
}
