use chrono::Utc;
use rust_decimal_macros::dec;

use crate::core::numbering::display_date;
use crate::core::{DocumentKind, FatooraError, InvoiceRequest, InvoiceRequestBuilder, LineItemBuilder};

use super::client::{CatalogElement, Contact, Lead};
use super::fields::{extract_discount_percent, field_value, field_value_by_code, parse_price};

/// Payment terms printed on a proforma when the lead carries none.
pub const DEFAULT_PROFORMA_TERMS: &str = "Advance payment of 50% before Delivery";

/// Fixed payment terms on tax invoices.
const TAX_TERMS: &str = "Payment on Delivery";

/// A product resolved from the CRM: the catalog element plus the quantity
/// taken from the lead's element link.
#[derive(Debug, Clone)]
pub struct Product {
    pub element: CatalogElement,
    pub quantity: rust_decimal::Decimal,
}

/// Assemble an invoice request from CRM records.
///
/// Field mapping follows the CRM account's conventions: customer address
/// from the lead's "Delivery address", email from the contact's EMAIL
/// code, TRN from the contact, discount from the lead's free-text
/// "Discount" field (applied to every line), prices from the product's
/// "Price (AED)" — VAT-inclusive, VAT fixed at 5%.
///
/// The result is fully validated; a lead without a usable contact email
/// fails here rather than producing an unmailable document.
pub fn build_invoice_request(
    kind: DocumentKind,
    lead: &Lead,
    contact: &Contact,
    products: &[Product],
) -> Result<InvoiceRequest, FatooraError> {
    if products.is_empty() {
        return Err(FatooraError::Crm(format!(
            "lead {} has no products attached",
            lead.id
        )));
    }

    let customer_name = contact
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| lead.name.clone())
        .unwrap_or_else(|| "Customer".to_string());

    let address = field_value(lead.custom_fields(), "Delivery address").unwrap_or_default();
    let email = field_value_by_code(contact.custom_fields(), "EMAIL").unwrap_or_default();
    let trn = field_value(contact.custom_fields(), "TRN").unwrap_or_default();

    let payment_terms = match kind {
        DocumentKind::Proforma => field_value(lead.custom_fields(), "Payment Terms")
            .unwrap_or_else(|| DEFAULT_PROFORMA_TERMS.to_string()),
        DocumentKind::Tax => TAX_TERMS.to_string(),
    };

    let amount_paid = match kind {
        DocumentKind::Proforma => deposit_amount(lead),
        DocumentKind::Tax => "0".to_string(),
    };

    let discount = field_value(lead.custom_fields(), "Discount")
        .map(|raw| extract_discount_percent(&raw))
        .unwrap_or_default();

    let mut builder = InvoiceRequestBuilder::new(
        kind.number_for_lead(lead.id),
        display_date(Utc::now().date_naive()),
        lead.id.to_string(),
    )
    .customer(customer_name, address)
    .customer_trn(trn)
    .customer_email(email.clone())
    .payment_terms(payment_terms)
    .amount_paid(amount_paid);

    for product in products {
        let element = &product.element;
        let description = element
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Product".to_string());

        let sku = field_value(element.custom_fields(), "SKU");
        let details = field_value(element.custom_fields(), "Product Details");
        let sub_description = match (sku, details) {
            (Some(sku), Some(details)) => format!("{sku}, {details}"),
            (Some(sku), None) => sku,
            (None, Some(details)) => details,
            (None, None) => String::new(),
        };

        let price = field_value(element.custom_fields(), "Price (AED)")
            .map(|raw| parse_price(&raw))
            .unwrap_or_default();

        let unit = field_value(element.custom_fields(), "Unit")
            .filter(|u| !u.is_empty() && u != "N/A")
            .unwrap_or_else(|| "Pcs".to_string());

        builder = builder.add_item(
            LineItemBuilder::new(description, product.quantity, price)
                .sub_description(sub_description)
                .unit(unit)
                .discount(discount)
                .tax(dec!(5))
                .build(),
        );
    }

    if !email.is_empty() {
        builder = builder.recipient(email);
    }

    builder.build()
}

/// "Amount paid" on proformas: the deposit amount, but only when the
/// lead's payment type actually mentions a deposit.
fn deposit_amount(lead: &Lead) -> String {
    let payment_type = field_value(lead.custom_fields(), "Payment");
    let deposit = field_value(lead.custom_fields(), "Deposit Amount");
    match (payment_type, deposit) {
        (Some(payment), Some(deposit)) if payment.to_lowercase().contains("deposit") => deposit,
        _ => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn lead() -> Lead {
        serde_json::from_str(
            r#"{
                "id": 12345,
                "name": "Gold ring for Jane",
                "custom_fields_values": [
                    {"field_name": "Delivery address", "values": [{"value": "Downtown Dubai"}]},
                    {"field_name": "Discount", "values": [{"value": "10%"}]},
                    {"field_name": "Payment", "values": [{"value": "Deposit + balance"}]},
                    {"field_name": "Deposit Amount", "values": [{"value": "5000"}]}
                ],
                "_embedded": {"contacts": [{"id": 777}]}
            }"#,
        )
        .unwrap()
    }

    fn contact() -> Contact {
        serde_json::from_str(
            r#"{
                "id": 777,
                "name": "Jane Doe",
                "custom_fields_values": [
                    {"field_code": "EMAIL", "values": [{"value": "jane@example.com"}]},
                    {"field_name": "TRN", "values": [{"value": "100123456700003"}]}
                ]
            }"#,
        )
        .unwrap()
    }

    fn product() -> Product {
        Product {
            element: serde_json::from_str(
                r#"{
                    "id": 501,
                    "name": "Gold ring",
                    "custom_fields_values": [
                        {"field_name": "SKU", "values": [{"value": "RING-001"}]},
                        {"field_name": "Product Details", "values": [{"value": "18k, size 7"}]},
                        {"field_name": "Price (AED)", "values": [{"value": "1,050.00"}]},
                        {"field_name": "Unit", "values": [{"value": "N/A"}]}
                    ]
                }"#,
            )
            .unwrap(),
            quantity: dec!(2),
        }
    }

    #[test]
    fn proforma_request_from_crm_records() {
        let request =
            build_invoice_request(DocumentKind::Proforma, &lead(), &contact(), &[product()])
                .unwrap();

        assert_eq!(request.invoice.number, "00PI25-00012345");
        assert_eq!(request.invoice.deal_number, "12345");
        assert_eq!(request.issued_to.name, "Jane Doe");
        assert_eq!(request.issued_to.trn, "100123456700003");
        assert_eq!(request.terms.amount_paid, "5000");
        assert_eq!(request.recipient_emails, vec!["jane@example.com"]);

        let item = &request.items[0];
        assert_eq!(item.description, "Gold ring");
        assert_eq!(item.sub_description, "RING-001, 18k, size 7");
        assert_eq!(item.quantity, dec!(2));
        assert_eq!(item.unit, "Pcs"); // "N/A" falls back
        assert_eq!(item.unit_price_incl_tax, dec!(1050.00));
        assert_eq!(item.discount_percent, dec!(10));
        assert_eq!(item.tax_percent, dec!(5));
    }

    #[test]
    fn tax_request_fixes_terms_and_numbering() {
        let request =
            build_invoice_request(DocumentKind::Tax, &lead(), &contact(), &[product()]).unwrap();
        assert_eq!(request.invoice.number, "TAXZS-12345");
        assert_eq!(request.terms.payment_terms, "Payment on Delivery");
        assert_eq!(request.terms.amount_paid, "0");
    }

    #[test]
    fn contact_without_email_fails_validation() {
        let contact: Contact = serde_json::from_str(r#"{"id": 777, "name": "Jane"}"#).unwrap();
        let err = build_invoice_request(DocumentKind::Proforma, &lead(), &contact, &[product()])
            .unwrap_err();
        assert!(matches!(err, FatooraError::Validation(_)));
    }

    #[test]
    fn lead_without_products_is_a_crm_error() {
        let err =
            build_invoice_request(DocumentKind::Proforma, &lead(), &contact(), &[]).unwrap_err();
        assert!(matches!(err, FatooraError::Crm(_)));
    }
}
