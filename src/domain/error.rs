use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration: {0}")]
    Config(String),

    /// Checkout could not be created: non-200, bad JSON or no `payment_url`.
    #[error("gateway: {0}")]
    Gateway(String),

    #[error("transport: {0}")]
    Transport(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
