use {
    crate::{
        adapters::uddoktapay::GatewayClient,
        config::HostConfig,
        domain::{
            error::GatewayError,
            id::{InvoicePublicId, ProcessorTransactionId},
            payment::CheckoutRedirect,
            ports::{AddPaymentOutcome, InvoiceLedger},
        },
        services::validator::{IncomingTransaction, Notification, Rejection, process_validated},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpnOutcome {
    /// Payment recorded against the invoice.
    Credited {
        invoice_id: InvoicePublicId,
        transaction_id: ProcessorTransactionId,
    },
    /// This transaction id was credited before; nothing changed.
    Duplicate {
        transaction_id: ProcessorTransactionId,
    },
    Rejected(Rejection),
}

/// Host-side checks before a checkout is opened, then the checkout itself.
pub async fn start_checkout(
    gateway: &GatewayClient,
    ledger: &dyn InvoiceLedger,
    host: &HostConfig,
    public_id: &InvoicePublicId,
) -> Result<CheckoutRedirect, GatewayError> {
    gateway.config().validate()?;

    let invoice = ledger
        .find_invoice(public_id)
        .await?
        .ok_or_else(|| GatewayError::InvoiceNotFound(public_id.to_string()))?;

    if invoice.is_paid() {
        return Err(GatewayError::Validation(format!(
            "invoice {public_id} is already paid"
        )));
    }
    if !gateway.supports(invoice.currency()) {
        return Err(GatewayError::Validation(format!(
            "currency {} is not supported by this gateway",
            invoice.currency()
        )));
    }

    gateway
        .create_checkout(&invoice, &host.checkout_urls(public_id))
        .await
}

/// Top-level webhook flow: validate the notification against the processor,
/// make sure the invoice exists, then credit it once.
pub async fn handle_notification(
    gateway: &GatewayClient,
    ledger: &dyn InvoiceLedger,
    notification: Notification,
) -> Result<IpnOutcome, GatewayError> {
    let mut transaction = IncomingTransaction::new(gateway, notification);
    let validated = match transaction.validate().await {
        Ok(v) => v,
        Err(rejection) => return Ok(IpnOutcome::Rejected(rejection)),
    };

    if ledger.find_invoice(&validated.invoice_id).await?.is_none() {
        return Ok(IpnOutcome::Rejected(Rejection::InvoiceNotFound(
            validated.invoice_id.to_string(),
        )));
    }

    let invoice_id = validated.invoice_id.clone();
    let transaction_id = validated.transaction_id.clone();
    match process_validated(ledger, validated).await? {
        AddPaymentOutcome::Added => Ok(IpnOutcome::Credited {
            invoice_id,
            transaction_id,
        }),
        AddPaymentOutcome::AlreadyRecorded => Ok(IpnOutcome::Duplicate { transaction_id }),
    }
}
