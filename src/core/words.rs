//! Amount-in-words conversion for the printed document.
//!
//! Legal invoices in the UAE carry the grand total spelled out. The
//! conversion is a pure function of one rounded number: round half-up to
//! 2 decimals, spell the integer part in English, append the fraction's
//! digits after "point" if nonzero, title-case every word, drop bare
//! "and" connectors, and finish with the fixed currency suffix.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use super::format::round_half_up;

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

// Short scale, far enough to cover Decimal's full integer range.
const SCALES: [&str; 10] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
];

/// Convert a monetary total into its printed words form.
///
/// ```
/// use fatoora::core::amount_to_words;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     amount_to_words(dec!(37920.00)),
///     "Thirty-Seven Thousand Nine Hundred Twenty AED ONLY"
/// );
/// ```
pub fn amount_to_words(amount: Decimal) -> String {
    // Round first so floating-scale artifacts never reach the word expansion.
    let rounded = round_half_up(amount, 2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let magnitude = rounded.abs();

    // Scale is at most 2 after rounding, so the fraction is exact cents.
    let whole = magnitude.trunc().to_u128().unwrap_or_default();
    let cents = (magnitude.fract() * dec!(100)).to_u32().unwrap_or_default() as u8;

    let mut words = spell_integer(whole);
    if cents != 0 {
        words.push_str(" point");
        for digit in fraction_digits(cents) {
            words.push(' ');
            words.push_str(ONES[digit as usize]);
        }
    }
    if negative {
        words = format!("minus {words}");
    }

    format!("{} AED ONLY", title_case_without_and(&words))
}

/// Spell the fraction's digits in order, trailing zero dropped
/// (".50" reads "point five", ".57" reads "point five seven").
fn fraction_digits(cents: u8) -> Vec<u8> {
    if cents % 10 == 0 {
        vec![cents / 10]
    } else {
        vec![cents / 10, cents % 10]
    }
}

/// Conventional English spellout, short scale, with "and" inside
/// three-digit groups ("nine hundred and twenty").
fn spell_integer(mut n: u128) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    while n > 0 {
        groups.push((n % 1000) as u16);
        n /= 1000;
    }

    let mut parts = Vec::new();
    for (scale, group) in groups.iter().enumerate().rev() {
        if *group == 0 {
            continue;
        }
        let mut part = spell_group(*group);
        if !SCALES[scale].is_empty() {
            part.push(' ');
            part.push_str(SCALES[scale]);
        }
        parts.push(part);
    }
    parts.join(" ")
}

fn spell_group(n: u16) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    let mut out = String::new();
    if hundreds > 0 {
        out.push_str(ONES[hundreds as usize]);
        out.push_str(" hundred");
        if rest > 0 {
            out.push_str(" and ");
        }
    }
    if rest > 0 {
        if rest < 20 {
            out.push_str(ONES[rest as usize]);
        } else {
            out.push_str(TENS[(rest / 10) as usize]);
            if rest % 10 > 0 {
                out.push('-');
                out.push_str(ONES[(rest % 10) as usize]);
            }
        }
    }
    out
}

/// Title-case each word (including hyphenated halves) and strip bare
/// "and" connectors for the terser legal-document style.
fn title_case_without_and(words: &str) -> String {
    words
        .split_whitespace()
        .filter(|w| !w.eq_ignore_ascii_case("and"))
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    word.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_example() {
        assert_eq!(
            amount_to_words(dec!(37920.00)),
            "Thirty-Seven Thousand Nine Hundred Twenty AED ONLY"
        );
    }

    #[test]
    fn no_standalone_and_survives() {
        for amount in [dec!(37920), dec!(105), dec!(1005), dec!(999999.99)] {
            let words = amount_to_words(amount);
            assert!(
                !words.split_whitespace().any(|w| w == "And"),
                "'And' leaked into {words:?}"
            );
        }
    }

    #[test]
    fn zero() {
        assert_eq!(amount_to_words(dec!(0)), "Zero AED ONLY");
    }

    #[test]
    fn cents_read_digit_by_digit() {
        assert_eq!(
            amount_to_words(dec!(1890.57)),
            "One Thousand Eight Hundred Ninety Point Five Seven AED ONLY"
        );
        // Trailing zero dropped.
        assert_eq!(amount_to_words(dec!(12.50)), "Twelve Point Five AED ONLY");
    }

    #[test]
    fn rounds_half_up_before_expanding() {
        assert_eq!(amount_to_words(dec!(99.995)), "One Hundred AED ONLY");
        assert_eq!(
            amount_to_words(dec!(1.004)),
            "One AED ONLY"
        );
    }

    #[test]
    fn large_amounts() {
        assert_eq!(
            amount_to_words(dec!(1000000)),
            "One Million AED ONLY"
        );
        assert_eq!(
            amount_to_words(dec!(2500000100)),
            "Two Billion Five Hundred Million One Hundred AED ONLY"
        );
    }

    #[test]
    fn title_case_applies_to_hyphen_halves() {
        assert_eq!(amount_to_words(dec!(42)), "Forty-Two AED ONLY");
    }
}
