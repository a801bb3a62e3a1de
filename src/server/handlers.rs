use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::core::{
    DocumentKind, FatooraError, InvoiceRequest, TaxInvoiceRequest, ensure_valid,
};

use super::flow::generate_and_dispatch;
use super::startup::AppState;

impl IntoResponse for FatooraError {
    fn into_response(self) -> Response {
        let status = match &self {
            FatooraError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FatooraError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "fatoora",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "up" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "error": e.to_string() })),
        ),
    }
}

/// Generate a proforma invoice: persist the record by deal number, then
/// render and dispatch.
pub async fn generate_proforma(
    State(state): State<AppState>,
    Json(request): Json<InvoiceRequest>,
) -> Result<Response, FatooraError> {
    ensure_valid(&request)?;

    let upsert = state.store.upsert_proforma(&request).await?;
    let dispatch = generate_and_dispatch(&state, DocumentKind::Proforma, &request).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Proforma invoice generated and sent successfully",
        "invoice_number": dispatch.invoice_number,
        "deal_number": request.invoice.deal_number,
        "database_operation": if upsert.is_new() { "created" } else { "updated" },
        "pdf_filename": dispatch.pdf_filename,
        "pdf_size_kb": dispatch.pdf_size_kb,
        "emails_sent_to": dispatch.emails_sent_to,
        "total_aed": dispatch.total_incl_tax,
    }))
    .into_response())
}

/// Generate a tax invoice from the stored proforma record: the body only
/// names the new number/date and the deal; items, customer, and recipients
/// come from the store, and the totals are recomputed from the raw items.
pub async fn generate_tax(
    State(state): State<AppState>,
    Json(body): Json<TaxInvoiceRequest>,
) -> Result<Response, FatooraError> {
    let deal_number = body.invoice.deal_number.clone();

    let record = state
        .store
        .find_by_deal_number(&deal_number)
        .await?
        .ok_or_else(|| {
            FatooraError::NotFound(format!(
                "no proforma invoice found for deal number: {deal_number}"
            ))
        })?;

    let mut request = record.request;
    request.invoice.number = body.invoice.number;
    request.invoice.date_of_issuing = body.invoice.date_of_issuing;

    if request.recipient_emails.is_empty() {
        return Err(FatooraError::Validation(format!(
            "no recipient emails stored for deal number: {deal_number}"
        )));
    }

    let dispatch = generate_and_dispatch(&state, DocumentKind::Tax, &request).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Tax invoice generated and sent successfully",
        "invoice_number": dispatch.invoice_number,
        "deal_number": deal_number,
        "pdf_filename": dispatch.pdf_filename,
        "pdf_size_kb": dispatch.pdf_size_kb,
        "emails_sent_to": dispatch.emails_sent_to,
        "total_aed": dispatch.total_incl_tax,
    }))
    .into_response())
}
