//! # Checkout Session Builder
//!
//! Translates a [`CheckoutConfig`] into the options object the checkout
//! widget constructor expects. Pure: no I/O, no clock, no unit conversion.

use crate::checkout::{CheckoutConfig, Prefill};
use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Widget theme block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub color: String,
}

/// Session options in the widget's wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub key: String,

    /// Minor units, exactly as configured
    pub amount: i64,

    pub currency: String,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub order_id: String,

    #[serde(default, skip_serializing_if = "Prefill::is_empty")]
    pub prefill: Prefill,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notes: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl SessionDescriptor {
    /// Serialize to the JSON object handed to the widget constructor
    pub fn to_json(&self) -> serde_json::Value {
        // Plain strings, integers and maps always serialize.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Build the session descriptor for one checkout attempt
pub fn build_session(config: &CheckoutConfig) -> CheckoutResult<SessionDescriptor> {
    if config.amount_minor < 0 {
        return Err(CheckoutError::Validation(format!(
            "amount must be non-negative, got {}",
            config.amount_minor
        )));
    }

    if config.currency.trim().is_empty() {
        return Err(CheckoutError::Validation(
            "currency code is required".to_string(),
        ));
    }

    if config.order_reference.trim().is_empty() {
        return Err(CheckoutError::Validation(
            "order reference is required".to_string(),
        ));
    }

    Ok(SessionDescriptor {
        key: config.merchant_key.clone(),
        amount: config.amount_minor,
        currency: config.currency.clone(),
        name: config.display_name.clone(),
        description: config.description.clone(),
        order_id: config.order_reference.clone(),
        prefill: Prefill {
            name: non_blank(&config.prefill.name),
            email: non_blank(&config.prefill.email),
            contact: non_blank(&config.prefill.contact),
        },
        notes: config.notes.clone(),
        theme: config
            .theme_color
            .as_ref()
            .map(|color| Theme { color: color.clone() }),
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(amount: i64) -> CheckoutConfig {
        CheckoutConfig::new("rzp_test_key", amount, "INR", "Acme", "order_1")
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        for amount in [-1, -100, i64::MIN] {
            let err = build_session(&config(amount)).unwrap_err();
            assert!(matches!(err, CheckoutError::Validation(_)));
        }
    }

    #[test]
    fn test_amount_is_preserved_unchanged() {
        for amount in [0, 1, 100, 100000, i64::MAX] {
            let session = build_session(&config(amount)).unwrap();
            assert_eq!(session.amount, amount);
        }
    }

    #[test]
    fn test_blank_currency_and_order_reference_are_rejected() {
        let mut cfg = config(100);
        cfg.currency = " ".to_string();
        assert!(matches!(
            build_session(&cfg),
            Err(CheckoutError::Validation(_))
        ));

        let mut cfg = config(100);
        cfg.order_reference = String::new();
        assert!(matches!(
            build_session(&cfg),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_prefill_and_theme_mapping() {
        let cfg = config(100000)
            .with_description("Purchase Description")
            .with_prefill(Prefill::new("Asha", "asha@example.com", "9876543210"))
            .with_theme_color("#3730a3");

        let session = build_session(&cfg).unwrap();
        assert_eq!(session.prefill.name.as_deref(), Some("Asha"));
        assert_eq!(session.prefill.email.as_deref(), Some("asha@example.com"));
        assert_eq!(session.prefill.contact.as_deref(), Some("9876543210"));
        assert_eq!(session.theme.as_ref().map(|t| t.color.as_str()), Some("#3730a3"));

        let json = session.to_json();
        assert_eq!(json["order_id"], "order_1");
        assert_eq!(json["theme"]["color"], "#3730a3");
        assert_eq!(json["prefill"]["contact"], "9876543210");
    }

    #[test]
    fn test_absent_theme_is_omitted() {
        let session = build_session(&config(100)).unwrap();
        let json = session.to_json();

        assert!(json.get("theme").is_none());
        assert!(json.get("prefill").is_none());
        assert!(json.get("notes").is_none());
    }
}
