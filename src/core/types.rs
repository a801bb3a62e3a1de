use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::numbering;

/// A single sellable position on an invoice.
///
/// `unit_price_incl_tax` already contains VAT; the calculator extracts the
/// tax-exclusive amount by division. The serde names match the wire format
/// the API accepts and the store persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Secondary description line (SKU, product details). Empty allowed.
    #[serde(default)]
    pub sub_description: String,
    pub quantity: Decimal,
    /// Unit of measure label printed on the document (e.g. "Pcs").
    #[serde(rename = "uom", default = "default_unit")]
    pub unit: String,
    /// VAT-inclusive unit price in AED.
    #[serde(rename = "price_incl_vat_aed")]
    pub unit_price_incl_tax: Decimal,
    /// Discount on the gross line amount, percent in [0, 100].
    #[serde(rename = "discount_pct", default)]
    pub discount_percent: Decimal,
    /// VAT rate percent applied on the tax-exclusive amount.
    #[serde(rename = "vat_pct", default = "default_tax_percent")]
    pub tax_percent: Decimal,
}

fn default_unit() -> String {
    "Pcs".to_string()
}

fn default_tax_percent() -> Decimal {
    dec!(5)
}

/// Per-line derived amounts. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComputedLine {
    /// quantity × unit_price_incl_tax, before discount.
    pub gross: Decimal,
    pub discount_amount: Decimal,
    /// Line amount after discount, VAT still included.
    pub amount_incl_tax: Decimal,
    /// Back-calculated from the inclusive amount: incl / (1 + rate/100).
    pub amount_excl_tax: Decimal,
    /// Residual incl − excl, so excl + tax == incl holds exactly.
    pub tax_amount: Decimal,
}

/// Aggregate document totals — running sums over the computed lines,
/// kept as raw `Decimal`. Formatting happens only at the rendering
/// boundary and never feeds back into arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub total_discount: Decimal,
    pub total_excl_tax: Decimal,
    pub total_tax: Decimal,
    pub total_incl_tax: Decimal,
}

/// Which document variant to produce. Both share the same calculator;
/// only presentation and numbering differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Proforma,
    Tax,
}

impl DocumentKind {
    /// Document title printed at the top of the page.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Proforma => "PROFORMA INVOICE",
            Self::Tax => "TAX INVOICE",
        }
    }

    /// Attachment filename prefix (e.g. "ProformaInvoice_00PI25-….pdf").
    pub fn attachment_prefix(&self) -> &'static str {
        match self {
            Self::Proforma => "ProformaInvoice",
            Self::Tax => "TaxInvoice",
        }
    }

    /// Email subject prefix.
    pub fn subject_prefix(&self) -> &'static str {
        match self {
            Self::Proforma => "Proforma Invoice",
            Self::Tax => "Tax Invoice",
        }
    }

    /// Stable slug used for store keys and logging.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Proforma => "proforma",
            Self::Tax => "tax",
        }
    }

    /// Derive the document number for a CRM lead.
    pub fn number_for_lead(&self, lead_id: u64) -> String {
        match self {
            Self::Proforma => numbering::proforma_number(lead_id),
            Self::Tax => numbering::tax_number(lead_id),
        }
    }
}

/// Invoice header block: the document number, a display date, and the
/// external deal identifier the proforma record is keyed by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceMeta {
    pub number: String,
    /// Display date, already formatted (e.g. "June 15, 2026").
    pub date_of_issuing: String,
    pub deal_number: String,
}

/// The party the document is issued to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub address: String,
    /// Tax registration number, optional for individuals.
    #[serde(default)]
    pub trn: String,
    pub email: String,
}

/// Commercial terms printed on the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terms {
    pub payment_terms: String,
    /// Amount already paid (deposit), display string.
    #[serde(default)]
    pub amount_paid: String,
}

/// A complete invoice generation request: header, customer, terms, items,
/// and the recipients the finished PDF is mailed to.
///
/// This is also the shape persisted per deal number — totals are never
/// stored, they are recomputed from `items` on every render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub invoice: InvoiceMeta,
    pub issued_to: Customer,
    pub terms: Terms,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub recipient_emails: Vec<String>,
}

/// Request body for turning a stored proforma into a tax invoice:
/// only the new number/date and the deal key — everything else comes
/// from the stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxInvoiceRequest {
    pub invoice: InvoiceMeta,
}

/// Issuer identity printed on every document. Explicit configuration,
/// injected at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub trn: String,
    pub tel: String,
    pub email: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "SUZANNE CODE JEWELLERY TRADING L.L.C.".into(),
            address: "Shop BF-05, Burj Khalifa, Emaar The Dubai Mall Fountain Views, PO Box:9440, Dubai, UAE".into(),
            trn: "104644174200003".into(),
            tel: "+971505752796".into(),
            email: "uae@suzannecode.com".into(),
        }
    }
}

/// Settlement details printed in the bank block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub iban: String,
    pub swift: String,
    pub beneficiary: String,
}

impl Default for BankDetails {
    fn default() -> Self {
        Self {
            bank_name: "Abu Dhabi Islamic Bank".into(),
            iban: "AE08500000000019283818".into(),
            swift: "ABDIAEADXXX".into(),
            beneficiary: "SUZANNE CODE JEWELLERY TRADING L.L.C.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_defaults_from_wire_json() {
        let item: LineItem = serde_json::from_str(
            r#"{"description":"Ring","quantity":2,"price_incl_vat_aed":1050}"#,
        )
        .unwrap();
        assert_eq!(item.unit, "Pcs");
        assert_eq!(item.discount_percent, dec!(0));
        assert_eq!(item.tax_percent, dec!(5));
        assert_eq!(item.sub_description, "");
    }

    #[test]
    fn line_item_accepts_fractional_quantity() {
        let item: LineItem = serde_json::from_str(
            r#"{"description":"Chain","quantity":"2.500","uom":"g","price_incl_vat_aed":"101.25","vat_pct":0}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, dec!(2.5));
        assert_eq!(item.tax_percent, dec!(0));
    }

    #[test]
    fn document_kind_numbers() {
        assert_eq!(DocumentKind::Proforma.number_for_lead(12345), "00PI25-00012345");
        assert_eq!(DocumentKind::Tax.number_for_lead(12345), "TAXZS-12345");
    }
}
