use {
    crate::domain::{
        error::GatewayError,
        id::{InvoicePublicId, ProcessorTransactionId},
        invoice::{Invoice, PaymentReceipt},
        ports::{AddPaymentOutcome, BoxFuture, InvoiceLedger},
    },
    std::{
        collections::{HashMap, HashSet},
        sync::RwLock,
    },
};

#[derive(Default)]
struct LedgerState {
    invoices: HashMap<InvoicePublicId, Invoice>,
    // Every transaction id ever credited, across all invoices.
    credited: HashSet<ProcessorTransactionId>,
}

/// Host-side invoice store used by the bundled service and the tests.
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, public_id: &InvoicePublicId) -> Option<Invoice> {
        self.state
            .read()
            .expect("ledger lock poisoned")
            .invoices
            .get(public_id)
            .cloned()
    }

    fn create(&self, invoice: Invoice) -> Result<(), GatewayError> {
        let mut state = self.state.write().expect("ledger lock poisoned");
        if state.invoices.contains_key(invoice.public_id()) {
            return Err(GatewayError::Validation(format!(
                "invoice already exists: {}",
                invoice.public_id()
            )));
        }
        state.invoices.insert(invoice.public_id().clone(), invoice);
        Ok(())
    }

    fn add(&self, receipt: PaymentReceipt) -> Result<AddPaymentOutcome, GatewayError> {
        // Check and insert under one write lock so concurrent deliveries of
        // the same transaction credit once.
        let mut state = self.state.write().expect("ledger lock poisoned");
        if state.credited.contains(&receipt.transaction_id) {
            return Ok(AddPaymentOutcome::AlreadyRecorded);
        }
        let transaction_id = receipt.transaction_id.clone();
        let invoice = state
            .invoices
            .get_mut(&receipt.invoice_id)
            .ok_or_else(|| GatewayError::InvoiceNotFound(receipt.invoice_id.to_string()))?;
        invoice.push_payment(receipt);
        state.credited.insert(transaction_id);
        Ok(AddPaymentOutcome::Added)
    }
}

impl InvoiceLedger for MemoryLedger {
    fn find_invoice<'a>(
        &'a self,
        public_id: &'a InvoicePublicId,
    ) -> BoxFuture<'a, Result<Option<Invoice>, GatewayError>> {
        Box::pin(async move { Ok(self.find(public_id)) })
    }

    fn create_invoice(&self, invoice: Invoice) -> BoxFuture<'_, Result<(), GatewayError>> {
        Box::pin(async move { self.create(invoice) })
    }

    fn add_payment(
        &self,
        receipt: PaymentReceipt,
    ) -> BoxFuture<'_, Result<AddPaymentOutcome, GatewayError>> {
        Box::pin(async move { self.add(receipt) })
    }
}
