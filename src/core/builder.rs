use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::FatooraError;
use super::types::*;
use super::validation;

/// Builder for constructing valid invoice requests.
///
/// ```
/// use fatoora::core::*;
/// use rust_decimal_macros::dec;
///
/// let request = InvoiceRequestBuilder::new("00PI25-00000042", "June 15, 2026", "42")
///     .customer("Jane Doe", "Downtown Dubai")
///     .customer_email("jane@example.com")
///     .payment_terms("Advance payment of 50% before Delivery")
///     .add_item(
///         LineItemBuilder::new("Gold ring", dec!(2), dec!(1050))
///             .discount(dec!(10))
///             .build(),
///     )
///     .recipient("jane@example.com")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.items.len(), 1);
/// ```
pub struct InvoiceRequestBuilder {
    number: String,
    date_of_issuing: String,
    deal_number: String,
    customer_name: String,
    customer_address: String,
    customer_trn: String,
    customer_email: String,
    payment_terms: String,
    amount_paid: String,
    items: Vec<LineItem>,
    recipient_emails: Vec<String>,
}

impl InvoiceRequestBuilder {
    pub fn new(
        number: impl Into<String>,
        date_of_issuing: impl Into<String>,
        deal_number: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            date_of_issuing: date_of_issuing.into(),
            deal_number: deal_number.into(),
            customer_name: String::new(),
            customer_address: String::new(),
            customer_trn: String::new(),
            customer_email: String::new(),
            payment_terms: String::new(),
            amount_paid: "0".to_string(),
            items: Vec::new(),
            recipient_emails: Vec::new(),
        }
    }

    pub fn customer(mut self, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self.customer_address = address.into();
        self
    }

    pub fn customer_trn(mut self, trn: impl Into<String>) -> Self {
        self.customer_trn = trn.into();
        self
    }

    pub fn customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = email.into();
        self
    }

    pub fn payment_terms(mut self, terms: impl Into<String>) -> Self {
        self.payment_terms = terms.into();
        self
    }

    pub fn amount_paid(mut self, amount: impl Into<String>) -> Self {
        self.amount_paid = amount.into();
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn recipient(mut self, email: impl Into<String>) -> Self {
        self.recipient_emails.push(email.into());
        self
    }

    /// Build the request and run full validation.
    /// Returns all validation errors joined into one message.
    pub fn build(self) -> Result<InvoiceRequest, FatooraError> {
        let request = self.assemble();
        validation::ensure_valid(&request)?;
        Ok(request)
    }

    /// Build without validation — useful for tests and for re-rendering
    /// stored records whose shape was validated on the way in.
    pub fn build_unchecked(self) -> InvoiceRequest {
        self.assemble()
    }

    fn assemble(self) -> InvoiceRequest {
        InvoiceRequest {
            invoice: InvoiceMeta {
                number: self.number,
                date_of_issuing: self.date_of_issuing,
                deal_number: self.deal_number,
            },
            issued_to: Customer {
                name: self.customer_name,
                address: self.customer_address,
                trn: self.customer_trn,
                email: self.customer_email,
            },
            terms: Terms {
                payment_terms: self.payment_terms,
                amount_paid: self.amount_paid,
            },
            items: self.items,
            recipient_emails: self.recipient_emails,
        }
    }
}

/// Builder for LineItem.
pub struct LineItemBuilder {
    description: String,
    sub_description: String,
    quantity: Decimal,
    unit: String,
    unit_price_incl_tax: Decimal,
    discount_percent: Decimal,
    tax_percent: Decimal,
}

impl LineItemBuilder {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price_incl_tax: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            sub_description: String::new(),
            quantity,
            unit: "Pcs".to_string(),
            unit_price_incl_tax,
            discount_percent: Decimal::ZERO,
            tax_percent: dec!(5),
        }
    }

    pub fn sub_description(mut self, sub: impl Into<String>) -> Self {
        self.sub_description = sub.into();
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn discount(mut self, percent: Decimal) -> Self {
        self.discount_percent = percent;
        self
    }

    pub fn tax(mut self, percent: Decimal) -> Self {
        self.tax_percent = percent;
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            description: self.description,
            sub_description: self.sub_description,
            quantity: self.quantity,
            unit: self.unit,
            unit_price_incl_tax: self.unit_price_incl_tax,
            discount_percent: self.discount_percent,
            tax_percent: self.tax_percent,
        }
    }
}
