//! UddoktaPay hosted checkout: outbound client and its reqwest transport.

pub mod client;
pub mod transport;

pub use client::GatewayClient;
pub use transport::ReqwestTransport;
