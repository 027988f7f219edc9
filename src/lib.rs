pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;
pub mod transport;

use {
    adapters::uddoktapay::GatewayClient, config::HostConfig, domain::ports::InvoiceLedger,
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayClient>,
    pub ledger: Arc<dyn InvoiceLedger>,
    pub host: Arc<HostConfig>,
}
