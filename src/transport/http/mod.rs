pub mod errors;
pub mod invoices;
pub mod ipn;

use {
    crate::{AppState, config::GATEWAY_ID},
    axum::{
        Router,
        extract::DefaultBodyLimit,
        http::StatusCode,
        routing::{get, post},
    },
    std::time::Duration,
    tower::ServiceBuilder,
    tower_http::timeout::TimeoutLayer,
};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/invoices", post(invoices::create_invoice))
        .route("/invoices/{public_id}", get(invoices::get_invoice))
        .route("/invoices/{public_id}/checkout", post(invoices::checkout_handler))
        .route(&format!("/payment/{GATEWAY_ID}/ipn"), post(ipn::ipn_handler))
        .route("/thanks", get(invoices::thanks_page))
        .route("/cancel", get(invoices::cancel_page))
        .layer(DefaultBodyLimit::max(64 * 1024)) // 64 KB, webhook payloads are a few hundred bytes
        .with_state(state)
}

/// `router` wrapped in the service-wide middleware. Slow requests get a 408.
pub fn app(state: AppState) -> Router {
    router(state).layer(ServiceBuilder::new().layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        REQUEST_TIMEOUT,
    )))
}
