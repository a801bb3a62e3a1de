//! The shared generation flow: compute → render → PDF → email.
//!
//! Both the HTTP handlers and the CRM poller drive this one path, so a
//! document looks the same no matter what triggered it.

use crate::core::format::format_amount;
use crate::core::numbering::number_slug;
use crate::core::{DocumentKind, FatooraError, InvoiceRequest, compute_totals};
use crate::render::render_with_computation;

use super::startup::AppState;

/// Summary of a completed generation + dispatch.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub invoice_number: String,
    pub pdf_filename: String,
    pub pdf_size_kb: u64,
    pub emails_sent_to: Vec<String>,
    /// Grand total, formatted for display.
    pub total_incl_tax: String,
}

/// Generate the document for `request` and mail it to its recipients.
///
/// Totals are always recomputed from the raw line items here — even when
/// the request was loaded from the store — so a stale stored string can
/// never reach a printed document.
pub async fn generate_and_dispatch(
    state: &AppState,
    kind: DocumentKind,
    request: &InvoiceRequest,
) -> Result<Dispatch, FatooraError> {
    let number = &request.invoice.number;
    tracing::info!(kind = kind.slug(), %number, "generating invoice");

    let computation = compute_totals(&request.items)?;
    let html = render_with_computation(kind, request, &computation, &state.config.company, &state.config.bank)?;
    let pdf = state.pdf.convert(&html, number).await?;
    let pdf_size_kb = (pdf.len() / 1024) as u64;

    let sent = state
        .mailer
        .send_document(kind, request, &computation.totals, &state.config.company, &pdf)
        .await?;

    tracing::info!(
        kind = kind.slug(),
        %number,
        recipients = sent.len(),
        pdf_size_kb,
        "invoice dispatched"
    );

    Ok(Dispatch {
        invoice_number: number.clone(),
        pdf_filename: format!("{}_{}.pdf", kind.attachment_prefix(), number_slug(number)),
        pdf_size_kb,
        emails_sent_to: sent.into_iter().map(|s| s.recipient).collect(),
        total_incl_tax: format_amount(computation.totals.total_incl_tax),
    })
}
