//! Compute totals for a small invoice and print them.
//!
//! Run with: `cargo run --example basic_totals`

use fatoora::core::*;
use fatoora::core::format::format_amount;
use rust_decimal_macros::dec;

fn main() {
    let items = vec![
        LineItemBuilder::new("Gold ring", dec!(2), dec!(1050.00))
            .sub_description("RING-001, 18k, size 7")
            .discount(dec!(10))
            .build(),
        LineItemBuilder::new("Silver chain", dec!(1), dec!(315.00)).build(),
    ];

    let computation = compute_totals(&items).expect("valid VAT rates");

    for (item, line) in items.iter().zip(&computation.lines) {
        println!(
            "{:<14} incl {:>10}  excl {:>10}  VAT {:>8}",
            item.description,
            format_amount(line.amount_incl_tax),
            format_amount(line.amount_excl_tax),
            format_amount(line.tax_amount),
        );
    }

    let totals = &computation.totals;
    println!();
    println!("Total Discount, (AED):    {}", format_amount(totals.total_discount));
    println!("Total (Excl. VAT), (AED): {}", format_amount(totals.total_excl_tax));
    println!("Total VAT, (AED):         {}", format_amount(totals.total_tax));
    println!("Total (Incl. VAT), (AED): {}", format_amount(totals.total_incl_tax));
    println!();
    println!("{}", amount_to_words(totals.total_incl_tax));
}
