mod common;

use common::*;
use rust_decimal::Decimal;
use uddokta_pay::adapters::uddoktapay::client::MAX_CHECKOUT_AMOUNT;
use uddokta_pay::config::{GatewayConfig, HostConfig};
use uddokta_pay::domain::error::GatewayError;
use uddokta_pay::domain::id::{InvoicePublicId, ProcessorTransactionId};
use uddokta_pay::domain::money::CurrencyCode;
use uddokta_pay::domain::payment::PaymentStatus;

fn urls(public_id: &str) -> uddokta_pay::domain::payment::CheckoutUrls {
    HostConfig::new(PUBLIC_URL)
        .unwrap()
        .checkout_urls(&InvoicePublicId::new(public_id).unwrap())
}

fn code(c: &str) -> CurrencyCode {
    CurrencyCode::new(c).unwrap()
}

// ── currency handling ─────────────────────────────────────────────────────

#[test]
fn bdt_is_identity_even_with_a_configured_bdt_rate() {
    let config = GatewayConfig::from_settings([
        ("api_url", API_URL),
        ("api_key", API_KEY),
        ("conversion_BDT", "2"),
    ])
    .unwrap();
    let h = Harness::new(config);

    let total = Decimal::new(49999, 2);
    assert_eq!(h.gateway.convert_amount(total, &code("BDT")).unwrap(), total);
}

#[test]
fn configured_currency_is_multiplied_by_its_rate() {
    let h = Harness::new(usd_rate(110));
    assert_eq!(
        h.gateway
            .convert_amount(Decimal::new(1050, 2), &code("USD"))
            .unwrap(),
        Decimal::new(115500, 2)
    );
}

#[test]
fn unconfigured_currency_passes_through() {
    let h = Harness::new(usd_rate(110));
    assert_eq!(
        h.gateway.convert_amount(Decimal::from(7), &code("EUR")).unwrap(),
        Decimal::from(7)
    );
    assert!(!h.gateway.supports(&code("EUR")));
}

#[test]
fn conversion_past_decimal_max_is_a_validation_error() {
    let h = Harness::new(usd_rate(110));
    let err = h
        .gateway
        .convert_amount(Decimal::MAX, &code("USD"))
        .unwrap_err();
    assert!(matches!(err, GatewayError::Validation(_)));

    // BDT is never multiplied, so even the largest total converts.
    assert_eq!(
        h.gateway.convert_amount(Decimal::MAX, &code("BDT")).unwrap(),
        Decimal::MAX
    );
}

#[test]
fn supported_currencies_always_include_bdt() {
    let h = Harness::new(GatewayConfig::new(API_URL, API_KEY));
    let codes: Vec<_> = h
        .gateway
        .supported_currencies()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(codes, vec!["BDT"]);

    let config = GatewayConfig::from_settings([
        ("conversion_USD", "110"),
        ("conversion_EUR", ""),
        ("conversion_GBP", "140.5"),
    ])
    .unwrap();
    let codes: Vec<_> = Harness::new(config)
        .gateway
        .supported_currencies()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(codes, vec!["BDT", "GBP", "USD"]);
}

// ── endpoint ──────────────────────────────────────────────────────────────

#[test]
fn endpoint_forces_https_and_drops_path_and_port() {
    let h = Harness::new(GatewayConfig::new(
        "http://pay.example.com:8080/api/checkout-v2?x=1",
        API_KEY,
    ));
    assert_eq!(
        h.gateway.endpoint("checkout").unwrap().as_str(),
        "https://pay.example.com/api/checkout"
    );
    assert_eq!(
        h.gateway.endpoint("verify-payment").unwrap().as_str(),
        "https://pay.example.com/api/verify-payment"
    );
}

#[test]
fn endpoint_without_a_usable_url_is_a_config_error() {
    let h = Harness::new(GatewayConfig::new("", API_KEY));
    assert!(matches!(
        h.gateway.endpoint("checkout"),
        Err(GatewayError::Config(_))
    ));
}

// ── create checkout ───────────────────────────────────────────────────────

#[tokio::test]
async fn checkout_returns_payment_url() {
    let h = Harness::new(usd_rate(110));
    h.transport.respond(
        "/api/checkout",
        200,
        r#"{"status":true,"message":"Payment Url","payment_url":"https://pay.example/x"}"#,
    );
    let invoice = make_invoice("INV-42", "USD", Decimal::new(1000, 2));

    let redirect = h
        .gateway
        .create_checkout(&invoice, &urls("INV-42"))
        .await
        .unwrap();
    assert_eq!(redirect.payment_url, "https://pay.example/x");
}

#[tokio::test]
async fn checkout_request_carries_key_and_converted_body() {
    let h = Harness::new(usd_rate(110));
    h.transport
        .respond("/api/checkout", 200, r#"{"payment_url":"https://pay.example/x"}"#);
    let invoice = make_invoice("INV-42", "USD", Decimal::new(1000, 2));

    h.gateway
        .create_checkout(&invoice, &urls("INV-42"))
        .await
        .unwrap();

    let sent = h.transport.requests_to("/api/checkout");
    assert_eq!(sent.len(), 1);
    let req = &sent[0];
    assert_eq!(req.url.as_str(), "https://sandbox.uddoktapay.example/api/checkout");
    assert!(
        req.headers
            .iter()
            .any(|(k, v)| *k == "RT-UDDOKTAPAY-API-KEY" && v == API_KEY)
    );
    assert!(
        req.headers
            .iter()
            .any(|(k, v)| *k == "content-type" && v == "application/json")
    );
    assert_eq!(
        req.body,
        serde_json::json!({
            "amount": 1100.0,
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "metadata": {"order_id": "INV-42"},
            "redirect_url": "https://billing.example/thanks?id=INV-42",
            "cancel_url": "https://billing.example/cancel?id=INV-42",
            "webhook_url": "https://billing.example/payment/uddokta-pay/ipn"
        })
    );
}

#[tokio::test]
async fn checkout_amount_is_rounded_to_two_places() {
    let h = Harness::new(usd_rate(110));
    h.transport
        .respond("/api/checkout", 200, r#"{"payment_url":"https://pay.example/x"}"#);
    // 1.23456 USD * 110 = 135.8016 BDT
    let invoice = make_invoice("INV-42", "USD", Decimal::new(123456, 5));

    h.gateway
        .create_checkout(&invoice, &urls("INV-42"))
        .await
        .unwrap();

    let sent = h.transport.requests_to("/api/checkout");
    assert_eq!(sent[0].body["amount"], serde_json::json!(135.8));
}

#[tokio::test]
async fn oversized_checkout_amount_is_refused_before_sending() {
    let h = Harness::new(usd_rate(110));
    for (currency, total) in [
        ("USD", Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0)),
        ("BDT", MAX_CHECKOUT_AMOUNT + Decimal::new(1, 2)),
    ] {
        let invoice = make_invoice("INV-BIG", currency, total);
        let err = h
            .gateway
            .create_checkout(&invoice, &urls("INV-BIG"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)), "{currency}: {err:?}");
    }
    assert!(h.transport.requests().is_empty());

    // The limit itself still goes out, unrounded by the float encoding.
    h.transport
        .respond("/api/checkout", 200, r#"{"payment_url":"https://pay.example/x"}"#);
    let invoice = make_invoice("INV-MAX", "BDT", MAX_CHECKOUT_AMOUNT);
    h.gateway
        .create_checkout(&invoice, &urls("INV-MAX"))
        .await
        .unwrap();
    let sent = h.transport.requests_to("/api/checkout");
    assert_eq!(sent[0].body["amount"].to_string(), "9999999999999.99");
}

#[tokio::test]
async fn checkout_non_200_is_a_gateway_error() {
    let h = Harness::new(usd_rate(110));
    h.transport.respond("/api/checkout", 500, r#"{"payment_url":"https://pay.example/x"}"#);
    let invoice = make_invoice("INV-42", "BDT", Decimal::from(500));

    let err = h
        .gateway
        .create_checkout(&invoice, &urls("INV-42"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Gateway(_)));
}

#[tokio::test]
async fn checkout_with_bad_body_is_a_gateway_error() {
    let invoice = make_invoice("INV-42", "BDT", Decimal::from(500));
    for body in ["<html>oops</html>", r#"{"status":false}"#, r#"{"payment_url":""}"#, "[]"] {
        let h = Harness::new(usd_rate(110));
        h.transport.respond("/api/checkout", 200, body);
        let err = h
            .gateway
            .create_checkout(&invoice, &urls("INV-42"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Gateway(_)), "body {body} gave {err:?}");
    }
}

#[tokio::test]
async fn checkout_transport_failure_is_not_retried() {
    let h = Harness::new(usd_rate(110));
    h.transport.reply("/api/checkout", Reply::Fail);
    let invoice = make_invoice("INV-42", "BDT", Decimal::from(500));

    let err = h
        .gateway
        .create_checkout(&invoice, &urls("INV-42"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(h.transport.requests().len(), 1);
}

// ── verify payment ────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_payment_returns_record_on_200() {
    let h = Harness::new(usd_rate(110));
    h.transport
        .respond("/api/verify-payment", 200, &payment_body("T1", "COMPLETED", "INV-42"));

    let record = h
        .gateway
        .verify_payment(&ProcessorTransactionId::new("Erm9wzjM0FBwjSYT0QVb").unwrap())
        .await
        .unwrap();
    assert_eq!(record.transaction_id(), Some("T1"));
    assert_eq!(record.status(), Some(PaymentStatus::Completed));

    let sent = h.transport.requests_to("/api/verify-payment");
    assert_eq!(sent[0].body, serde_json::json!({"invoice_id": "Erm9wzjM0FBwjSYT0QVb"}));
}

#[tokio::test]
async fn verify_payment_is_absent_on_404() {
    let h = Harness::new(usd_rate(110));
    h.transport.respond("/api/verify-payment", 404, r#"{"message":"not found"}"#);
    let id = ProcessorTransactionId::new("missing").unwrap();
    assert!(h.gateway.verify_payment(&id).await.is_none());
}

#[tokio::test]
async fn verify_payment_is_absent_on_bad_json_or_transport_failure() {
    let id = ProcessorTransactionId::new("T1").unwrap();

    let h = Harness::new(usd_rate(110));
    h.transport.respond("/api/verify-payment", 200, "not json");
    assert!(h.gateway.verify_payment(&id).await.is_none());

    let h = Harness::new(usd_rate(110));
    h.transport.reply("/api/verify-payment", Reply::Fail);
    assert!(h.gateway.verify_payment(&id).await.is_none());
}

// ── audit log ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn exchanges_are_audited_without_the_api_key() {
    let h = Harness::new(usd_rate(110));
    h.transport.respond("/api/checkout", 500, "down");
    let invoice = make_invoice("INV-42", "BDT", Decimal::from(500));
    let _ = h.gateway.create_checkout(&invoice, &urls("INV-42")).await;

    let entries = h.audit.entries_titled("checkout");
    assert_eq!(entries.len(), 1);
    let detail = &entries[0].detail;
    assert_eq!(entries[0].gateway_id, "uddokta-pay");
    assert_eq!(detail["response"]["status"], 500);
    assert_eq!(detail["request"]["headers"]["RT-UDDOKTAPAY-API-KEY"], "***");
    assert!(!detail.to_string().contains(API_KEY));
}

#[tokio::test]
async fn debug_off_records_nothing() {
    let h = Harness::new(usd_rate(110).with_debug(false));
    h.transport.respond("/api/verify-payment", 404, "");
    h.gateway
        .verify_payment(&ProcessorTransactionId::new("T1").unwrap())
        .await;
    assert!(h.audit.entries().is_empty());
}
