use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::{FatooraError, ValidationError};
use super::types::InvoiceRequest;

/// Input limit to prevent abuse.
const MAX_ITEMS: usize = 1_000;

/// Validate an invoice generation request.
/// Returns all validation errors found (not just the first).
///
/// This is the request-schema layer the calculator relies on: the
/// calculator itself does not defend against negative quantities or
/// out-of-range percentages — they are rejected here, before any
/// arithmetic runs.
pub fn validate_request(request: &InvoiceRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if request.invoice.number.trim().is_empty() {
        errors.push(ValidationError::new(
            "invoice.number",
            "invoice number must not be empty",
        ));
    }
    if request.invoice.deal_number.trim().is_empty() {
        errors.push(ValidationError::new(
            "invoice.deal_number",
            "deal number must not be empty",
        ));
    }
    if request.issued_to.name.trim().is_empty() {
        errors.push(ValidationError::new(
            "issued_to.name",
            "customer name must not be empty",
        ));
    }
    if !request.issued_to.email.trim().is_empty() && !request.issued_to.email.contains('@') {
        errors.push(ValidationError::new(
            "issued_to.email",
            "customer email is not a valid address",
        ));
    }

    if request.items.is_empty() {
        errors.push(ValidationError::new(
            "items",
            "at least one line item is required",
        ));
    }
    if request.items.len() > MAX_ITEMS {
        errors.push(ValidationError::new(
            "items",
            format!("invoice cannot have more than {MAX_ITEMS} line items"),
        ));
    }

    for (i, item) in request.items.iter().enumerate() {
        validate_item(item, i, &mut errors);
    }

    if request.recipient_emails.is_empty() {
        errors.push(ValidationError::new(
            "recipient_emails",
            "at least one recipient email is required",
        ));
    }
    for (i, email) in request.recipient_emails.iter().enumerate() {
        if !email.contains('@') {
            errors.push(ValidationError::new(
                format!("recipient_emails[{i}]"),
                format!("'{email}' is not a valid address"),
            ));
        }
    }

    errors
}

fn validate_item(item: &super::types::LineItem, index: usize, errors: &mut Vec<ValidationError>) {
    let path = |field: &str| format!("items[{index}].{field}");

    if item.description.trim().is_empty() {
        errors.push(ValidationError::new(
            path("description"),
            "description must not be empty",
        ));
    }
    if item.quantity <= Decimal::ZERO {
        errors.push(ValidationError::new(
            path("quantity"),
            "quantity must be positive",
        ));
    }
    if item.unit_price_incl_tax < Decimal::ZERO {
        errors.push(ValidationError::new(
            path("price_incl_vat_aed"),
            "unit price must not be negative",
        ));
    }
    if item.discount_percent < Decimal::ZERO || item.discount_percent > dec!(100) {
        errors.push(ValidationError::new(
            path("discount_pct"),
            "discount must be between 0 and 100",
        ));
    }
    if item.tax_percent <= dec!(-100) {
        errors.push(ValidationError::new(
            path("vat_pct"),
            "VAT rate must be greater than -100",
        ));
    }
}

/// Validate and collapse any errors into a single `FatooraError::Validation`.
pub fn ensure_valid(request: &InvoiceRequest) -> Result<(), FatooraError> {
    let errors = validate_request(request);
    if errors.is_empty() {
        Ok(())
    } else {
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(FatooraError::Validation(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InvoiceRequestBuilder, LineItemBuilder};

    fn valid_request() -> InvoiceRequest {
        InvoiceRequestBuilder::new("00PI25-00000001", "June 15, 2026", "123")
            .customer("Jane Doe", "Downtown Dubai")
            .customer_email("jane@example.com")
            .payment_terms("Advance payment of 50% before Delivery")
            .add_item(LineItemBuilder::new("Ring", dec!(1), dec!(1050)).build())
            .recipient("jane@example.com")
            .build_unchecked()
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate_request(&valid_request()).is_empty());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut req = valid_request();
        req.invoice.number.clear();
        req.items[0].quantity = dec!(0);
        req.items[0].discount_percent = dec!(101);
        req.recipient_emails = vec!["not-an-email".into()];

        let errors = validate_request(&req);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"invoice.number"));
        assert!(fields.contains(&"items[0].quantity"));
        assert!(fields.contains(&"items[0].discount_pct"));
        assert!(fields.contains(&"recipient_emails[0]"));
    }

    #[test]
    fn empty_items_rejected() {
        let mut req = valid_request();
        req.items.clear();
        assert!(matches!(
            ensure_valid(&req),
            Err(FatooraError::Validation(_))
        ));
    }

    #[test]
    fn degenerate_vat_rate_rejected() {
        let mut req = valid_request();
        req.items[0].tax_percent = dec!(-100);
        let errors = validate_request(&req);
        assert!(errors.iter().any(|e| e.field == "items[0].vat_pct"));
    }
}
