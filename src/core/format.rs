//! Display formatting for monetary values, quantities, and percentages.
//!
//! Presentation-only: every formatter rounds and stringifies a finished
//! `Decimal`. Aggregation always happens on raw values first — a formatted
//! string is never parsed back into arithmetic.

use rust_decimal::Decimal;

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Monetary amount: thousands separators, exactly 2 decimals ("12,345.67").
pub fn format_amount(value: Decimal) -> String {
    format_grouped(value, 2)
}

/// Quantity: 3 decimals ("2.000").
pub fn format_quantity(value: Decimal) -> String {
    format_grouped(value, 3)
}

/// Percentage: whole number, no decimals ("10").
pub fn format_percent(value: Decimal) -> String {
    format_grouped(value, 0)
}

fn format_grouped(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_up(value, dp);
    rounded.rescale(dp);
    let plain = rounded.to_string();

    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let grouped = group_thousands(int_part);
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_have_two_decimals_and_separators() {
        assert_eq!(format_amount(dec!(37920)), "37,920.00");
        assert_eq!(format_amount(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_amount(dec!(0)), "0.00");
        assert_eq!(format_amount(dec!(999.999)), "1,000.00");
    }

    #[test]
    fn quantities_have_three_decimals() {
        assert_eq!(format_quantity(dec!(2)), "2.000");
        assert_eq!(format_quantity(dec!(2.5)), "2.500");
        assert_eq!(format_quantity(dec!(1000)), "1,000.000");
    }

    #[test]
    fn percentages_are_whole_numbers() {
        assert_eq!(format_percent(dec!(10)), "10");
        assert_eq!(format_percent(dec!(5.4)), "5");
        assert_eq!(format_percent(dec!(5.5)), "6");
        assert_eq!(format_percent(dec!(0)), "0");
    }

    #[test]
    fn half_up_not_bankers() {
        assert_eq!(format_amount(dec!(2.675)), "2.68");
        assert_eq!(format_amount(dec!(2.665)), "2.67");
    }

    #[test]
    fn negative_amounts_keep_grouping() {
        assert_eq!(format_amount(dec!(-1234.5)), "-1,234.50");
    }
}
