use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::error::FatooraError;
use super::types::{ComputedLine, InvoiceTotals, LineItem};

/// Result of running the totals calculator over an item sequence:
/// one [`ComputedLine`] per input item, in input order, plus the
/// aggregate [`InvoiceTotals`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Computation {
    pub lines: Vec<ComputedLine>,
    pub totals: InvoiceTotals,
}

/// Compute per-line amounts and aggregate totals for an invoice.
///
/// Pure and deterministic: same input sequence ⇒ same output, always.
/// Per item, in order:
///
/// 1. `gross = quantity × unit_price_incl_tax`
/// 2. `discount_amount = gross × discount_percent / 100`
/// 3. `amount_incl_tax = gross − discount_amount`
/// 4. `amount_excl_tax = amount_incl_tax / (1 + tax_percent/100)` —
///    a back-calculation from the VAT-inclusive amount. Prices already
///    contain VAT, so the exclusive amount must be extracted by division.
/// 5. `tax_amount = amount_incl_tax − amount_excl_tax` — the residual,
///    so `excl + tax == incl` holds exactly even after the division
///    rounds to Decimal's working precision.
///
/// Totals accumulate as running sums in item order. An empty sequence
/// yields all-zero totals. Zero quantities or prices produce zero lines
/// with no special-casing.
///
/// # Errors
///
/// `FatooraError::Arithmetic` if an item's `tax_percent` is -100, which
/// makes the VAT divisor zero. That is a configuration error upstream,
/// not a retryable condition.
pub fn compute_totals(items: &[LineItem]) -> Result<Computation, FatooraError> {
    let mut lines = Vec::with_capacity(items.len());
    let mut totals = InvoiceTotals::default();

    for item in items {
        let gross = item.quantity * item.unit_price_incl_tax;
        let discount_amount = gross * item.discount_percent / dec!(100);
        let amount_incl_tax = gross - discount_amount;

        let divisor = Decimal::ONE + item.tax_percent / dec!(100);
        let amount_excl_tax = amount_incl_tax.checked_div(divisor).ok_or_else(|| {
            FatooraError::Arithmetic(format!(
                "VAT rate of {}% makes the line divisor zero",
                item.tax_percent
            ))
        })?;
        let tax_amount = amount_incl_tax - amount_excl_tax;

        totals.total_discount += discount_amount;
        totals.total_excl_tax += amount_excl_tax;
        totals.total_tax += tax_amount;
        totals.total_incl_tax += amount_incl_tax;

        lines.push(ComputedLine {
            gross,
            discount_amount,
            amount_incl_tax,
            amount_excl_tax,
            tax_amount,
        });
    }

    Ok(Computation { lines, totals })
}
