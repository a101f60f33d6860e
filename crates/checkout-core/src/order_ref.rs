//! # Order References
//!
//! Every checkout attempt needs an order reference before the widget
//! opens. Production integrations create the order on their backend;
//! [`LocalOrderReference`] synthesizes one client-side for development.

use crate::error::CheckoutResult;
use async_trait::async_trait;
use chrono::Utc;
use std::cell::Cell;
use tracing::debug;

/// Source of order references, usually a backend create-order call.
///
/// Implementations that talk to a network must map transport failures to
/// [`CheckoutError::BackendUnavailable`](crate::CheckoutError::BackendUnavailable).
#[async_trait(?Send)]
pub trait OrderReferenceSource {
    async fn create_order_reference(&self, amount_minor: i64) -> CheckoutResult<String>;
}

/// Client-side placeholder producing `order_<unix-millis>`.
///
/// Values are strictly increasing within the process: two calls in the
/// same millisecond get consecutive values.
#[derive(Debug, Default)]
pub struct LocalOrderReference {
    last: Cell<i64>,
}

impl LocalOrderReference {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_token(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let token = now.max(self.last.get() + 1);
        self.last.set(token);
        token
    }
}

#[async_trait(?Send)]
impl OrderReferenceSource for LocalOrderReference {
    async fn create_order_reference(&self, amount_minor: i64) -> CheckoutResult<String> {
        let reference = format!("order_{}", self.next_token());
        debug!(amount_minor, %reference, "Created local order reference");
        Ok(reference)
    }
}
