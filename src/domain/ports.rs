//! Seams to the host platform and the network.
//!
//! The gateway never talks to a database or an HTTP stack directly; the host
//! supplies these implementations (see `infra` for the bundled ones).

use {
    super::audit::NewAuditEntry,
    super::error::GatewayError,
    super::id::InvoicePublicId,
    super::invoice::{Invoice, PaymentReceipt},
    std::{future::Future, pin::Pin},
    url::Url,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Headers whose values must never reach an audit record.
pub const SENSITIVE_HEADERS: &[&str] = &["RT-UDDOKTAPAY-API-KEY"];

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

impl OutboundRequest {
    pub fn to_audit_json(&self) -> serde_json::Value {
        let headers: serde_json::Map<String, serde_json::Value> = self
            .headers
            .iter()
            .map(|(name, value)| {
                let shown = if SENSITIVE_HEADERS
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(name))
                {
                    "***".to_string()
                } else {
                    value.clone()
                };
                (name.to_string(), serde_json::Value::String(shown))
            })
            .collect();

        serde_json::json!({
            "method": "POST",
            "url": self.url.as_str(),
            "headers": headers,
            "body": self.body,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn to_audit_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.status,
            "body": self.body,
        })
    }
}

pub trait GatewayTransport: Send + Sync {
    /// Sends a JSON POST. `Err` only for failures below HTTP; any status code
    /// is returned as a response.
    fn post_json<'a>(
        &'a self,
        request: &'a OutboundRequest,
    ) -> BoxFuture<'a, Result<RawResponse, GatewayError>>;
}

pub trait AuditSink: Send + Sync {
    fn record(&self, entry: NewAuditEntry);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPaymentOutcome {
    Added,
    /// The transaction id was already credited; nothing changed.
    AlreadyRecorded,
}

pub trait InvoiceLedger: Send + Sync {
    fn find_invoice<'a>(
        &'a self,
        public_id: &'a InvoicePublicId,
    ) -> BoxFuture<'a, Result<Option<Invoice>, GatewayError>>;

    fn create_invoice(&self, invoice: Invoice) -> BoxFuture<'_, Result<(), GatewayError>>;

    /// Records a completed payment. Must be idempotent on `receipt.transaction_id`.
    fn add_payment(
        &self,
        receipt: PaymentReceipt,
    ) -> BoxFuture<'_, Result<AddPaymentOutcome, GatewayError>>;
}
