use {
    crate::{
        config::{GATEWAY_ID, GatewayConfig},
        domain::{
            audit::NewAuditEntry,
            error::GatewayError,
            id::ProcessorTransactionId,
            invoice::Invoice,
            money::{ConversionRate, CurrencyCode},
            payment::{
                CheckoutMetadata, CheckoutRedirect, CheckoutRequest, CheckoutUrls, PaymentRecord,
            },
            ports::{AuditSink, GatewayTransport, OutboundRequest, RawResponse},
        },
    },
    rust_decimal::{Decimal, RoundingStrategy},
    secrecy::ExposeSecret,
    std::{collections::BTreeSet, sync::Arc},
    url::Url,
};

pub const API_KEY_HEADER: &str = "RT-UDDOKTAPAY-API-KEY";

/// Largest checkout amount sent on the wire: 15 significant digits at two
/// decimal places, which survives the JSON float encoding unchanged.
pub const MAX_CHECKOUT_AMOUNT: Decimal =
    Decimal::from_parts(0xa4c6_7fff, 0x0003_8d7e, 0, false, 2);

#[derive(serde::Deserialize)]
struct CheckoutResponse {
    #[serde(default)]
    payment_url: Option<String>,
}

/// Outbound side of the gateway: checkout creation and payment verification.
pub struct GatewayClient {
    config: GatewayConfig,
    transport: Arc<dyn GatewayTransport>,
    audit: Arc<dyn AuditSink>,
}

impl GatewayClient {
    pub fn new(
        config: GatewayConfig,
        transport: Arc<dyn GatewayTransport>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            config,
            transport,
            audit,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn audit(&self) -> &dyn AuditSink {
        &*self.audit
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// BDT plus every currency with a configured conversion rate.
    pub fn supported_currencies(&self) -> BTreeSet<CurrencyCode> {
        let mut set: BTreeSet<_> = self.config.configured_currencies().cloned().collect();
        set.insert(CurrencyCode::bdt());
        set
    }

    pub fn supports(&self, currency: &CurrencyCode) -> bool {
        currency.is_settlement() || self.config.rate(currency).is_some()
    }

    /// Converts an invoice total into BDT. BDT itself is never rescaled; an
    /// unconfigured currency passes through at rate 1.
    pub fn convert_amount(
        &self,
        total: Decimal,
        currency: &CurrencyCode,
    ) -> Result<Decimal, GatewayError> {
        if currency.is_settlement() {
            return Ok(total);
        }
        self.config
            .rate(currency)
            .unwrap_or_else(ConversionRate::identity)
            .apply(total)
    }

    /// `https://<api host>/api/<slug>`. Scheme, port and path of the
    /// configured URL are ignored.
    pub fn endpoint(&self, slug: &str) -> Result<Url, GatewayError> {
        let configured = Url::parse(self.config.api_url())
            .map_err(|e| GatewayError::Config(format!("api_url is not a valid URL: {e}")))?;
        let host = configured
            .host_str()
            .ok_or_else(|| GatewayError::Config("api_url has no host".into()))?;
        Url::parse(&format!("https://{host}/api/{slug}"))
            .map_err(|e| GatewayError::Config(format!("cannot build endpoint {slug}: {e}")))
    }

    /// Builds the checkout body. The amount is rounded to poisha and refused
    /// above `MAX_CHECKOUT_AMOUNT`.
    pub fn checkout_request(
        &self,
        invoice: &Invoice,
        urls: &CheckoutUrls,
    ) -> Result<CheckoutRequest, GatewayError> {
        let amount = self
            .convert_amount(invoice.first_total(), invoice.currency())?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if amount > MAX_CHECKOUT_AMOUNT {
            return Err(GatewayError::Validation(format!(
                "checkout amount {amount} BDT exceeds {MAX_CHECKOUT_AMOUNT}"
            )));
        }

        Ok(CheckoutRequest {
            amount: amount.normalize(),
            full_name: invoice.payer().name.clone(),
            email: invoice.payer().email.clone(),
            metadata: CheckoutMetadata {
                order_id: invoice.public_id().as_str().to_string(),
            },
            redirect_url: urls.redirect_url.clone(),
            cancel_url: urls.cancel_url.clone(),
            webhook_url: urls.webhook_url.clone(),
        })
    }

    /// Opens a hosted checkout session and returns where to send the payer.
    #[tracing::instrument(name = "checkout", skip_all, fields(invoice = %invoice.public_id()))]
    pub async fn create_checkout(
        &self,
        invoice: &Invoice,
        urls: &CheckoutUrls,
    ) -> Result<CheckoutRedirect, GatewayError> {
        let body = serde_json::to_value(self.checkout_request(invoice, urls)?)?;
        let request = self.request("checkout", body)?;
        let response = self.send("checkout", &request).await?;

        if response.status != 200 {
            tracing::warn!(status = response.status, "checkout rejected by processor");
            return Err(GatewayError::Gateway(format!(
                "checkout returned HTTP {}",
                response.status
            )));
        }

        let parsed: CheckoutResponse = serde_json::from_str(&response.body)
            .map_err(|e| GatewayError::Gateway(format!("checkout response is not JSON: {e}")))?;

        match parsed.payment_url.filter(|u| !u.is_empty()) {
            Some(payment_url) => {
                tracing::info!("checkout session created");
                Ok(CheckoutRedirect { payment_url })
            }
            None => Err(GatewayError::Gateway(
                "checkout response has no payment_url".into(),
            )),
        }
    }

    /// Looks up a payment on the processor. `None` means it could not be
    /// verified, for whatever reason.
    #[tracing::instrument(name = "verify_payment", skip_all, fields(transaction_id = %id))]
    pub async fn verify_payment(&self, id: &ProcessorTransactionId) -> Option<PaymentRecord> {
        let body = serde_json::json!({ "invoice_id": id.as_str() });
        let request = match self.request("verify-payment", body) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "cannot build verify-payment request");
                return None;
            }
        };

        let response = match self.send("verify-payment", &request).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "verify-payment request failed");
                return None;
            }
        };

        if response.status != 200 {
            tracing::warn!(status = response.status, "verify-payment returned non-200");
            return None;
        }
        PaymentRecord::from_body(&response.body)
    }

    fn request(
        &self,
        slug: &str,
        body: serde_json::Value,
    ) -> Result<OutboundRequest, GatewayError> {
        Ok(OutboundRequest {
            url: self.endpoint(slug)?,
            headers: vec![
                (
                    API_KEY_HEADER,
                    self.config.api_key().expose_secret().to_string(),
                ),
                ("content-type", "application/json".to_string()),
            ],
            body,
        })
    }

    async fn send(
        &self,
        title: &str,
        request: &OutboundRequest,
    ) -> Result<RawResponse, GatewayError> {
        let result = self.transport.post_json(request).await;
        self.log(title, request, &result);
        result
    }

    fn log(
        &self,
        title: &str,
        request: &OutboundRequest,
        result: &Result<RawResponse, GatewayError>,
    ) {
        if !self.config.debug() {
            return;
        }
        let response = match result {
            Ok(r) => r.to_audit_json(),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        self.audit.record(NewAuditEntry::new(
            GATEWAY_ID,
            title,
            serde_json::json!({
                "request": request.to_audit_json(),
                "response": response,
            }),
        ));
    }
}
