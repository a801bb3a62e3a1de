use chrono::NaiveDate;

/// Proforma invoice number prefix. The trailing digits are the CRM lead id,
/// zero-padded so numbers sort lexicographically.
pub const PROFORMA_PREFIX: &str = "00PI25";

/// Tax invoice number prefix.
pub const TAX_PREFIX: &str = "TAXZS";

/// Proforma number for a CRM lead: `00PI25-00012345`.
pub fn proforma_number(lead_id: u64) -> String {
    format!("{PROFORMA_PREFIX}-{lead_id:08}")
}

/// Tax invoice number for a CRM lead: `TAXZS-00042`.
pub fn tax_number(lead_id: u64) -> String {
    format!("{TAX_PREFIX}-{lead_id:05}")
}

/// Date as printed on documents: "June 15, 2026".
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Turn an invoice number into a filesystem/attachment-safe slug.
pub fn number_slug(number: &str) -> String {
    number.replace('/', "-").replace(' ', "_")
}
