#![no_main]

use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

use fatoora::core::{LineItemBuilder, compute_totals};

fuzz_target!(|data: &[u8]| {
    // Interpret the input as a sequence of (mantissa, scale) pairs and
    // build arbitrary line items. Errors are fine, panics are bugs.
    let mut items = Vec::new();
    for chunk in data.chunks_exact(10).take(64) {
        let qty = decimal(&chunk[0..5]);
        let price = decimal(&chunk[5..10]);
        items.push(
            LineItemBuilder::new("fuzz", qty, price)
                .discount(Decimal::from(chunk[0] % 101))
                .tax(Decimal::from(chunk[5] % 50))
                .build(),
        );
    }
    if let Ok(c) = compute_totals(&items) {
        assert_eq!(c.lines.len(), items.len());
    }
});

fn decimal(bytes: &[u8]) -> Decimal {
    let mantissa = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    Decimal::new(i64::from(mantissa), u32::from(bytes[4] % 10))
}
