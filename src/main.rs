use {
    std::{env, sync::Arc},
    tokio::signal,
    uddokta_pay::{
        AppState,
        adapters::uddoktapay::{GatewayClient, ReqwestTransport},
        config::{GatewayConfig, HostConfig},
        infra::memory::{MemoryAuditLog, MemoryLedger},
        transport::http::app,
    },
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let gateway_config = GatewayConfig::from_env().expect("invalid UDDOKTAPAY_* settings");
    if let Err(e) = gateway_config.validate() {
        // Checkout is refused until this is fixed; webhooks still answer.
        tracing::warn!(error = %e, "gateway is not configured");
    }
    let host = HostConfig::from_env().expect("APP_PUBLIC_URL must be a valid URL");
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        debug = gateway_config.debug(),
        configured = gateway_config.is_configured(),
        "uddokta-pay gateway loaded"
    );

    let gateway = GatewayClient::new(
        gateway_config,
        Arc::new(ReqwestTransport::new()),
        Arc::new(MemoryAuditLog::new()),
    );
    let state = AppState {
        gateway: Arc::new(gateway),
        ledger: Arc::new(MemoryLedger::new()),
        host: Arc::new(host),
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
