#![no_main]

use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

use fatoora::core::amount_to_words;

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let mantissa = i64::from_le_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ]);
    let amount = Decimal::new(mantissa, u32::from(data[8] % 15));

    // Must not panic for any input, and the suffix is unconditional.
    let words = amount_to_words(amount);
    assert!(words.ends_with("AED ONLY"));
});
