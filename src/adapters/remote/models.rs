//! Order service request and response bodies
//!
//! These are wire shapes only. Domain types live in [`crate::domain`].

use crate::domain::{Order, OrderId};
use serde::{Deserialize, Serialize};

/// `GET /orders` response envelope
#[derive(Debug, Deserialize)]
pub struct OrderListResponse {
    #[serde(default)]
    pub data: Vec<Order>,
}

/// `POST /export/order` request body
#[derive(Debug, Serialize)]
pub struct BatchExportRequest<'a> {
    #[serde(rename = "orderIds")]
    pub order_ids: &'a [OrderId],
}

/// `POST /generate-pdf` request body
///
/// The endpoint takes a list but the console always sends one order.
#[derive(Debug, Serialize)]
pub struct ContractRequest<'a> {
    pub orders: [&'a Order; 1],
}

/// Binary document returned by an export endpoint
#[derive(Debug, Clone)]
pub struct DocumentBytes {
    /// `Content-Type` header as sent, if any
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentBytes {
    /// True when the `Content-Type` header is exactly `expected`
    ///
    /// No parameter stripping or case folding: `application/pdf; charset=x`
    /// does not match `application/pdf`.
    pub fn has_content_type(&self, expected: &str) -> bool {
        self.content_type.as_deref() == Some(expected)
    }
}
