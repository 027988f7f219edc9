use {
    crate::domain::error::GatewayError,
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
};

pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            GatewayError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
            GatewayError::InvoiceNotFound(id) => (
                StatusCode::NOT_FOUND,
                "invoice_not_found",
                format!("invoice {id} not found"),
            ),
            GatewayError::Config(msg) => {
                tracing::error!("gateway configuration error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "gateway_not_configured",
                    "payment gateway is not configured".to_string(),
                )
            }
            GatewayError::Gateway(msg) => {
                tracing::error!("gateway error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "gateway_error",
                    "payment gateway error".to_string(),
                )
            }
            GatewayError::Transport(msg) => {
                tracing::error!("gateway transport error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "gateway_unreachable",
                    "payment gateway unreachable".to_string(),
                )
            }
            GatewayError::Serialization(err) => {
                tracing::error!("serialization error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
