#![allow(dead_code)]

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uddokta_pay::AppState;
use uddokta_pay::adapters::uddoktapay::GatewayClient;
use uddokta_pay::config::{GatewayConfig, HostConfig};
use uddokta_pay::domain::error::GatewayError;
use uddokta_pay::domain::id::InvoicePublicId;
use uddokta_pay::domain::invoice::{Invoice, Payer};
use uddokta_pay::domain::money::{ConversionRate, CurrencyCode};
use uddokta_pay::domain::ports::{
    BoxFuture, GatewayTransport, InvoiceLedger, OutboundRequest, RawResponse,
};
use uddokta_pay::infra::memory::{MemoryAuditLog, MemoryLedger};

pub const API_URL: &str = "http://sandbox.uddoktapay.example/some/path";
pub const API_KEY: &str = "982d381360a69d419689740d9f2e26ce36fb7a50";
pub const PUBLIC_URL: &str = "https://billing.example";

#[derive(Clone)]
pub enum Reply {
    Respond(u16, String),
    Fail,
}

/// Scripted transport keyed by request path. Unscripted paths answer 404.
#[derive(Default)]
pub struct StubTransport {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, path: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(path.to_string(), reply);
    }

    pub fn respond(&self, path: &str, status: u16, body: &str) {
        self.reply(path, Reply::Respond(status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<OutboundRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }
}

impl GatewayTransport for StubTransport {
    fn post_json<'a>(
        &'a self,
        request: &'a OutboundRequest,
    ) -> BoxFuture<'a, Result<RawResponse, GatewayError>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            let reply = self.replies.lock().unwrap().get(request.url.path()).cloned();
            match reply {
                Some(Reply::Respond(status, body)) => Ok(RawResponse { status, body }),
                Some(Reply::Fail) => Err(GatewayError::Transport("connection refused".into())),
                None => Ok(RawResponse {
                    status: 404,
                    body: "not found".into(),
                }),
            }
        })
    }
}

pub fn usd_rate(rate: i64) -> GatewayConfig {
    GatewayConfig::new(API_URL, API_KEY).with_rate(
        CurrencyCode::new("USD").unwrap(),
        ConversionRate::new(Decimal::from(rate)).unwrap(),
    )
}

pub struct Harness {
    pub gateway: Arc<GatewayClient>,
    pub transport: Arc<StubTransport>,
    pub audit: Arc<MemoryAuditLog>,
    pub ledger: Arc<MemoryLedger>,
}

impl Harness {
    pub fn new(config: GatewayConfig) -> Self {
        let transport = StubTransport::new();
        let audit = Arc::new(MemoryAuditLog::new());
        let gateway = Arc::new(GatewayClient::new(
            config,
            transport.clone(),
            audit.clone(),
        ));
        Self {
            gateway,
            transport,
            audit,
            ledger: Arc::new(MemoryLedger::new()),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            gateway: self.gateway.clone(),
            ledger: self.ledger.clone(),
            host: Arc::new(HostConfig::new(PUBLIC_URL).unwrap()),
        }
    }

    pub async fn add_invoice(&self, public_id: &str, currency: &str, total: Decimal) -> Invoice {
        let invoice = make_invoice(public_id, currency, total);
        self.ledger.create_invoice(invoice.clone()).await.unwrap();
        invoice
    }

    pub async fn stored_invoice(&self, public_id: &str) -> Invoice {
        self.ledger
            .find_invoice(&InvoicePublicId::new(public_id).unwrap())
            .await
            .unwrap()
            .unwrap()
    }
}

pub fn make_invoice(public_id: &str, currency: &str, total: Decimal) -> Invoice {
    Invoice::new(
        InvoicePublicId::new(public_id).unwrap(),
        CurrencyCode::new(currency).unwrap(),
        total,
        Payer {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
        },
    )
}

pub fn payment_body(transaction_id: &str, status: &str, order_id: &str) -> String {
    serde_json::json!({
        "full_name": "Jane Doe",
        "email": "jane@example.com",
        "amount": "500.00",
        "fee": "0.00",
        "charged_amount": "500.00",
        "invoice_id": "Erm9wzjM0FBwjSYT0QVb",
        "metadata": {"order_id": order_id},
        "payment_method": "bkash",
        "sender_number": "01311111111",
        "transaction_id": transaction_id,
        "date": "2023-01-07 14:00:50",
        "status": status
    })
    .to_string()
}
