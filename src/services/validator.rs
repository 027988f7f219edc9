//! Validation of an inbound payment notification.
//!
//! The notification itself is never trusted: its transaction id is used to
//! fetch the canonical record from the processor, and that record is run
//! through a fixed chain of checks. The first failing check rejects the
//! notification and nothing after it runs.

use {
    crate::{
        adapters::uddoktapay::GatewayClient,
        config::GATEWAY_ID,
        domain::{
            audit::NewAuditEntry,
            error::GatewayError,
            id::{InvoicePublicId, ProcessorTransactionId},
            invoice::PaymentReceipt,
            payment::{PaymentRecord, PaymentStatus},
            ports::{AddPaymentOutcome, InvoiceLedger},
        },
    },
    derive_more::Display,
};

/// Field carrying the processor transaction id in webhook payloads.
pub const NOTIFICATION_ID_FIELD: &str = "invoice_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    transaction_id: Option<ProcessorTransactionId>,
}

impl Notification {
    pub fn new(transaction_id: Option<ProcessorTransactionId>) -> Self {
        Self { transaction_id }
    }

    /// Reads and filters `invoice_id` from already-decoded webhook fields.
    pub fn from_field(raw: Option<&str>) -> Self {
        Self::new(raw.and_then(ProcessorTransactionId::filtered))
    }

    pub fn transaction_id(&self) -> Option<&ProcessorTransactionId> {
        self.transaction_id.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Rejection {
    #[display("payment could not be verified with the processor")]
    SourceUnavailable,
    #[display("payment status is {_0}, expected COMPLETED")]
    StatusNotCompleted(String),
    #[display("payment record has no metadata.order_id")]
    MissingOrderId,
    #[display("payment record has no transaction_id")]
    MissingTransactionId,
    #[display("invoice {_0} does not exist")]
    InvoiceNotFound(String),
}

/// A notification that passed every check, ready to be credited.
#[derive(Debug, Clone)]
pub struct ValidatedPayment {
    pub invoice_id: InvoicePublicId,
    pub transaction_id: ProcessorTransactionId,
    pub record: PaymentRecord,
}

pub struct IncomingTransaction<'a> {
    gateway: &'a GatewayClient,
    notification: Notification,
    payment: Option<PaymentRecord>,
}

impl<'a> IncomingTransaction<'a> {
    pub fn new(gateway: &'a GatewayClient, notification: Notification) -> Self {
        Self {
            gateway,
            notification,
            payment: None,
        }
    }

    pub fn payment(&self) -> Option<&PaymentRecord> {
        self.payment.as_ref()
    }

    pub async fn validate(&mut self) -> Result<ValidatedPayment, Rejection> {
        self.fetch().await;
        self.validate_source()?;
        self.validate_status()?;
        self.validate_terms()?;
        let invoice_id = self.find_invoice_id()?;
        let transaction_id = self.uniq_id()?;

        let record = self.record()?.clone();
        Ok(ValidatedPayment {
            invoice_id,
            transaction_id,
            record,
        })
    }

    async fn fetch(&mut self) {
        if let Some(id) = self.notification.transaction_id() {
            self.payment = self.gateway.verify_payment(id).await;
        }

        let fetched = self
            .payment
            .as_ref()
            .map(|p| p.raw().clone())
            .unwrap_or(serde_json::Value::Null);
        self.gateway.audit().record(NewAuditEntry::new(
            GATEWAY_ID,
            "ipn",
            serde_json::json!({
                "transaction_id": self.notification.transaction_id().map(|id| id.as_str()),
                "payment": fetched,
            }),
        ));
    }

    fn record(&self) -> Result<&PaymentRecord, Rejection> {
        self.payment.as_ref().ok_or(Rejection::SourceUnavailable)
    }

    fn validate_source(&self) -> Result<(), Rejection> {
        self.record().map(|_| ())
    }

    fn validate_status(&self) -> Result<(), Rejection> {
        match self.record()?.status() {
            Some(PaymentStatus::Completed) => Ok(()),
            Some(other) => Err(Rejection::StatusNotCompleted(other.to_string())),
            None => Err(Rejection::StatusNotCompleted("missing".into())),
        }
    }

    // No business terms beyond the status check.
    fn validate_terms(&self) -> Result<(), Rejection> {
        Ok(())
    }

    fn find_invoice_id(&self) -> Result<InvoicePublicId, Rejection> {
        self.record()?
            .order_id()
            .and_then(|id| InvoicePublicId::new(id).ok())
            .ok_or(Rejection::MissingOrderId)
    }

    fn uniq_id(&self) -> Result<ProcessorTransactionId, Rejection> {
        self.record()?
            .transaction_id()
            .and_then(|id| ProcessorTransactionId::new(id).ok())
            .ok_or(Rejection::MissingTransactionId)
    }
}

/// Credits the invoice. The ledger decides whether the transaction id was
/// already used.
pub async fn process_validated(
    ledger: &dyn InvoiceLedger,
    validated: ValidatedPayment,
) -> Result<AddPaymentOutcome, GatewayError> {
    let receipt = PaymentReceipt {
        transaction_id: validated.transaction_id,
        invoice_id: validated.invoice_id,
        gateway_id: GATEWAY_ID,
        amount: validated.record.amount,
        payment_method: validated.record.payment_method.clone(),
        raw: validated.record.raw().clone(),
        received_at: chrono::Utc::now(),
    };
    ledger.add_payment(receipt).await
}
