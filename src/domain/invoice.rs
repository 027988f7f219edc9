use {
    super::id::{InvoicePublicId, ProcessorTransactionId},
    super::money::CurrencyCode,
    chrono::{DateTime, Utc},
    rust_decimal::Decimal,
    serde::Serialize,
};

#[derive(Debug, Clone, Serialize)]
pub struct Payer {
    pub name: String,
    pub email: String,
}

/// Host-side invoice, as far as the gateway needs to see it.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    public_id: InvoicePublicId,
    currency: CurrencyCode,
    first_total: Decimal,
    payer: Payer,
    payments: Vec<PaymentReceipt>,
}

impl Invoice {
    pub fn new(
        public_id: InvoicePublicId,
        currency: CurrencyCode,
        first_total: Decimal,
        payer: Payer,
    ) -> Self {
        Self {
            public_id,
            currency,
            first_total,
            payer,
            payments: Vec::new(),
        }
    }

    pub fn public_id(&self) -> &InvoicePublicId {
        &self.public_id
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn first_total(&self) -> Decimal {
        self.first_total
    }

    pub fn payer(&self) -> &Payer {
        &self.payer
    }

    pub fn payments(&self) -> &[PaymentReceipt] {
        &self.payments
    }

    pub fn is_paid(&self) -> bool {
        !self.payments.is_empty()
    }

    pub(crate) fn push_payment(&mut self, receipt: PaymentReceipt) {
        self.payments.push(receipt);
    }
}

/// A completed payment handed to the host ledger.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: ProcessorTransactionId,
    pub invoice_id: InvoicePublicId,
    pub gateway_id: &'static str,
    pub amount: Option<Decimal>,
    pub payment_method: Option<String>,
    pub raw: serde_json::Value,
    pub received_at: DateTime<Utc>,
}
