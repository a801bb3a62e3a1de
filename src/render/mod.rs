//! HTML document rendering.
//!
//! One template serves both document variants; [`DocumentKind`] only
//! changes the title and the terms block. The template receives
//! pre-formatted strings — all arithmetic is finished before anything
//! is stringified.

use askama::Template;

use crate::core::format::{format_amount, format_percent, format_quantity};
use crate::core::{
    BankDetails, CompanyProfile, Computation, Customer, DocumentKind, FatooraError,
    InvoiceRequest, amount_to_words, compute_totals,
};

/// One row of the printed items table, every cell already formatted.
struct LineRow {
    index: usize,
    description: String,
    sub_description: String,
    quantity: String,
    unit: String,
    unit_price: String,
    discount_percent: String,
    tax_percent: String,
    tax_amount: String,
    amount: String,
}

#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceTemplate {
    title: String,
    number: String,
    date_of_issuing: String,
    company: CompanyProfile,
    bank: BankDetails,
    customer: Customer,
    payment_terms: String,
    amount_paid: String,
    is_tax: bool,
    rows: Vec<LineRow>,
    amount_in_words: String,
    total_discount: String,
    total_excl_tax: String,
    total_tax: String,
    total_incl_tax: String,
}

/// Render a request straight to HTML, computing totals from the raw items.
///
/// Totals are never read from storage — recomputation from the line items
/// is the source of truth for every render.
pub fn render_document(
    kind: DocumentKind,
    request: &InvoiceRequest,
    company: &CompanyProfile,
    bank: &BankDetails,
) -> Result<String, FatooraError> {
    let computation = compute_totals(&request.items)?;
    render_with_computation(kind, request, &computation, company, bank)
}

/// Render with an already-computed [`Computation`] (avoids recomputing when
/// the caller also needs the totals for the email body).
pub fn render_with_computation(
    kind: DocumentKind,
    request: &InvoiceRequest,
    computation: &Computation,
    company: &CompanyProfile,
    bank: &BankDetails,
) -> Result<String, FatooraError> {
    let rows = request
        .items
        .iter()
        .zip(&computation.lines)
        .enumerate()
        .map(|(i, (item, line))| LineRow {
            index: i + 1,
            description: item.description.clone(),
            sub_description: item.sub_description.clone(),
            quantity: format_quantity(item.quantity),
            unit: item.unit.clone(),
            unit_price: format_amount(item.unit_price_incl_tax),
            discount_percent: format_percent(item.discount_percent),
            tax_percent: format_percent(item.tax_percent),
            tax_amount: format_amount(line.tax_amount),
            amount: format_amount(line.amount_incl_tax),
        })
        .collect();

    let template = InvoiceTemplate {
        title: kind.title().to_string(),
        number: request.invoice.number.clone(),
        date_of_issuing: request.invoice.date_of_issuing.clone(),
        company: company.clone(),
        bank: bank.clone(),
        customer: request.issued_to.clone(),
        payment_terms: request.terms.payment_terms.clone(),
        amount_paid: request.terms.amount_paid.clone(),
        is_tax: kind == DocumentKind::Tax,
        rows,
        amount_in_words: amount_to_words(computation.totals.total_incl_tax),
        total_discount: format_amount(computation.totals.total_discount),
        total_excl_tax: format_amount(computation.totals.total_excl_tax),
        total_tax: format_amount(computation.totals.total_tax),
        total_incl_tax: format_amount(computation.totals.total_incl_tax),
    };

    template
        .render()
        .map_err(|e| FatooraError::Render(e.to_string()))
}
