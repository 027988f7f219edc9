use {
    crate::{
        AppState,
        domain::{
            error::GatewayError,
            id::InvoicePublicId,
            invoice::{Invoice, Payer},
            money::CurrencyCode,
        },
        services::payment_pipeline::start_checkout,
        transport::http::errors::ApiError,
    },
    axum::{
        Json,
        extract::{Path, Query, State},
        http::StatusCode,
        response::Redirect,
    },
    rust_decimal::Decimal,
    serde::Deserialize,
    uuid::Uuid,
};

#[derive(Debug, Deserialize)]
pub struct NewInvoiceBody {
    #[serde(default)]
    pub public_id: Option<String>,
    pub currency: String,
    pub total: Decimal,
    pub payer_name: String,
    pub payer_email: String,
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(body): Json<NewInvoiceBody>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    if body.total <= Decimal::ZERO {
        return Err(GatewayError::Validation("total must be positive".into()).into());
    }
    let public_id = match body.public_id {
        Some(id) => InvoicePublicId::new(id)?,
        None => InvoicePublicId::new(Uuid::now_v7().simple().to_string())?,
    };
    let invoice = Invoice::new(
        public_id,
        CurrencyCode::new(&body.currency)?,
        body.total,
        Payer {
            name: body.payer_name,
            email: body.payer_email,
        },
    );

    state.ledger.create_invoice(invoice.clone()).await?;
    tracing::info!(invoice = %invoice.public_id(), currency = %invoice.currency(), "invoice created");
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let public_id = InvoicePublicId::new(public_id)?;
    let invoice = state
        .ledger
        .find_invoice(&public_id)
        .await?
        .ok_or_else(|| GatewayError::InvoiceNotFound(public_id.to_string()))?;
    Ok(Json(invoice))
}

/// Opens a hosted checkout and sends the payer there.
#[tracing::instrument(name = "start_checkout", skip_all, fields(invoice = %public_id))]
pub async fn checkout_handler(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Redirect, ApiError> {
    let public_id = InvoicePublicId::new(public_id)?;
    let redirect = start_checkout(&state.gateway, &*state.ledger, &state.host, &public_id).await?;
    Ok(Redirect::to(&redirect.payment_url))
}

#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    #[serde(default)]
    pub id: Option<String>,
}

pub async fn thanks_page(Query(q): Query<ReturnQuery>) -> String {
    match q.id {
        Some(id) => format!("Thank you. Payment for invoice {id} is being confirmed."),
        None => "Thank you. Your payment is being confirmed.".to_string(),
    }
}

pub async fn cancel_page(Query(q): Query<ReturnQuery>) -> String {
    match q.id {
        Some(id) => format!("Payment for invoice {id} was cancelled."),
        None => "Payment was cancelled.".to_string(),
    }
}
