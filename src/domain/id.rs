use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::GatewayError;

/// The processor's identifier for a payment attempt.
///
/// UddoktaPay calls this `invoice_id` in both the verify-payment API and the
/// webhook payload. It is unrelated to the platform's own invoice ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessorTransactionId(String);

impl ProcessorTransactionId {
    pub fn new(id: impl Into<String>) -> Result<Self, GatewayError> {
        let id = id.into();
        if id.is_empty() {
            return Err(GatewayError::Validation(
                "ProcessorTransactionId cannot be empty".into(),
            ));
        }
        Ok(Self(id))
    }

    /// Keeps `[A-Za-z0-9_-]` only. Returns `None` when nothing survives.
    pub fn filtered(raw: &str) -> Option<Self> {
        let id: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        Self::new(id).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Public identifier of a platform invoice (`metadata.order_id` on the processor side).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoicePublicId(String);

impl InvoicePublicId {
    pub fn new(id: impl Into<String>) -> Result<Self, GatewayError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(GatewayError::Validation(
                "InvoicePublicId cannot be empty".into(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
