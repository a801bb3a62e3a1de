use fatoora::core::*;
use rust_decimal_macros::dec;

fn item(
    qty: rust_decimal::Decimal,
    price: rust_decimal::Decimal,
    discount: rust_decimal::Decimal,
    tax: rust_decimal::Decimal,
) -> LineItem {
    LineItemBuilder::new("Item", qty, price)
        .discount(discount)
        .tax(tax)
        .build()
}

// --- Concrete scenarios ---

#[test]
fn single_item_scenario() {
    // qty=2, price=1050.00, disc=10%, vat=5%
    let c = compute_totals(&[item(dec!(2), dec!(1050.00), dec!(10), dec!(5))]).unwrap();

    let line = &c.lines[0];
    assert_eq!(line.gross, dec!(2100.00));
    assert_eq!(line.discount_amount, dec!(210.00));
    assert_eq!(line.amount_incl_tax, dec!(1890.00));
    assert_eq!(line.amount_excl_tax, dec!(1800.00));
    assert_eq!(line.tax_amount, dec!(90.00));

    assert_eq!(c.totals.total_discount, dec!(210.00));
    assert_eq!(c.totals.total_excl_tax, dec!(1800.00));
    assert_eq!(c.totals.total_tax, dec!(90.00));
    assert_eq!(c.totals.total_incl_tax, dec!(1890.00));
}

#[test]
fn non_terminating_division_stays_consistent() {
    // 100 + 200 at 5% VAT: excl = 285.714285…, tax = 14.285714…
    let c = compute_totals(&[
        item(dec!(1), dec!(100.00), dec!(0), dec!(5)),
        item(dec!(1), dec!(200.00), dec!(0), dec!(5)),
    ])
    .unwrap();

    assert_eq!(c.totals.total_incl_tax, dec!(300.00));

    let tolerance = dec!(0.000000001);
    // Aggregate identity within 1e-9 even though 1/1.05 never terminates.
    assert!(
        (c.totals.total_excl_tax + c.totals.total_tax - c.totals.total_incl_tax).abs() < tolerance
    );

    assert!((c.totals.total_excl_tax - dec!(285.714285714)).abs() < dec!(0.000001));
    for line in &c.lines {
        assert!((line.amount_excl_tax + line.tax_amount - line.amount_incl_tax).abs() < tolerance);
    }
}

#[test]
fn lines_come_back_in_input_order() {
    let items = vec![
        LineItemBuilder::new("First", dec!(1), dec!(10)).build(),
        LineItemBuilder::new("Second", dec!(1), dec!(20)).build(),
        LineItemBuilder::new("Third", dec!(1), dec!(30)).build(),
    ];
    let c = compute_totals(&items).unwrap();
    assert_eq!(c.lines.len(), 3);
    assert_eq!(c.lines[0].gross, dec!(10));
    assert_eq!(c.lines[1].gross, dec!(20));
    assert_eq!(c.lines[2].gross, dec!(30));
}

#[test]
fn zero_quantity_and_zero_price_lines_are_plain_zeros() {
    let c = compute_totals(&[
        item(dec!(0), dec!(1000), dec!(50), dec!(5)),
        item(dec!(3), dec!(0), dec!(10), dec!(5)),
        item(dec!(2), dec!(50), dec!(0), dec!(5)),
    ])
    .unwrap();

    assert_eq!(c.lines[0].amount_incl_tax, dec!(0));
    assert_eq!(c.lines[0].tax_amount, dec!(0));
    assert_eq!(c.lines[1].amount_incl_tax, dec!(0));
    // The one real line is the whole total.
    assert_eq!(c.totals.total_incl_tax, dec!(100));
}

#[test]
fn hundred_percent_discount_zeroes_the_line() {
    let c = compute_totals(&[item(dec!(1), dec!(500), dec!(100), dec!(5))]).unwrap();
    assert_eq!(c.lines[0].discount_amount, dec!(500));
    assert_eq!(c.lines[0].amount_incl_tax, dec!(0));
    assert_eq!(c.lines[0].tax_amount, dec!(0));
    assert_eq!(c.totals.total_incl_tax, dec!(0));
}

#[test]
fn fractional_quantities() {
    // 2.5 g × 101.25/g = 253.125 gross
    let c = compute_totals(&[item(dec!(2.5), dec!(101.25), dec!(0), dec!(0))]).unwrap();
    assert_eq!(c.lines[0].gross, dec!(253.125));
    assert_eq!(c.lines[0].amount_excl_tax, dec!(253.125));
}

// --- Calculator contract ---

#[test]
fn idempotent_bit_identical_repeat() {
    let items = vec![
        item(dec!(2), dec!(1050.00), dec!(10), dec!(5)),
        item(dec!(1.5), dec!(99.99), dec!(0), dec!(5)),
    ];
    let first = compute_totals(&items).unwrap();
    let second = compute_totals(&items).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mixed_tax_rates_accumulate_independently() {
    let c = compute_totals(&[
        item(dec!(1), dec!(105), dec!(0), dec!(5)),
        item(dec!(1), dec!(100), dec!(0), dec!(0)),
    ])
    .unwrap();

    assert_eq!(c.lines[0].tax_amount, dec!(5));
    assert_eq!(c.lines[1].tax_amount, dec!(0));
    assert_eq!(c.totals.total_tax, dec!(5));
    assert_eq!(c.totals.total_excl_tax, dec!(200));
    assert_eq!(c.totals.total_incl_tax, dec!(205));
}

#[test]
fn request_validation_guards_the_calculator() {
    // The calculator itself accepts negatives — rejecting them is the
    // request layer's job.
    let request = InvoiceRequestBuilder::new("N-1", "June 15, 2026", "1")
        .customer("Jane", "Dubai")
        .customer_email("jane@example.com")
        .payment_terms("net 30")
        .add_item(item(dec!(-1), dec!(100), dec!(0), dec!(5)))
        .recipient("jane@example.com")
        .build_unchecked();

    let errors = validate_request(&request);
    assert!(errors.iter().any(|e| e.field == "items[0].quantity"));
}
