use {
    crate::{
        AppState,
        services::{
            payment_pipeline::{IpnOutcome, handle_notification},
            validator::{NOTIFICATION_ID_FIELD, Notification},
        },
        transport::http::errors::ApiError,
    },
    axum::{
        Json,
        extract::{Query, State},
        http::StatusCode,
    },
    std::collections::HashMap,
};

/// Pulls the processor transaction id out of a webhook delivery. JSON bodies
/// win, then form bodies, then the query string.
pub fn notification_id(body: &str, query: &HashMap<String, String>) -> Option<String> {
    let body = body.trim();
    if !body.is_empty() {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
            match map.get(NOTIFICATION_ID_FIELD) {
                Some(serde_json::Value::String(s)) => return Some(s.clone()),
                Some(serde_json::Value::Number(n)) => return Some(n.to_string()),
                _ => {}
            }
        } else if let Some((_, v)) = url::form_urlencoded::parse(body.as_bytes())
            .find(|(k, _)| k == NOTIFICATION_ID_FIELD)
        {
            return Some(v.into_owned());
        }
    }
    query.get(NOTIFICATION_ID_FIELD).cloned()
}

#[tracing::instrument(
    name = "ipn",
    skip_all,
    fields(transaction_id = tracing::field::Empty)
)]
pub async fn ipn_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let notification = Notification::from_field(notification_id(&body, &query).as_deref());
    if let Some(id) = notification.transaction_id() {
        tracing::Span::current().record("transaction_id", tracing::field::display(id));
    }

    match handle_notification(&state.gateway, &*state.ledger, notification).await? {
        IpnOutcome::Credited {
            invoice_id,
            transaction_id,
        } => {
            tracing::info!(invoice = %invoice_id, transaction = %transaction_id, "payment credited");
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({"status": "credited", "invoice_id": invoice_id})),
            ))
        }
        IpnOutcome::Duplicate { transaction_id } => {
            tracing::info!(transaction = %transaction_id, "transaction already credited");
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({"status": "duplicate"})),
            ))
        }
        IpnOutcome::Rejected(rejection) => {
            tracing::warn!(reason = %rejection, "notification rejected");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "error_code": "transaction_invalid",
                    "message": rejection.to_string(),
                })),
            ))
        }
    }
}
