use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fatoora::core::*;

fn build_items(n: usize) -> Vec<LineItem> {
    (1..=n)
        .map(|i| {
            LineItemBuilder::new(
                format!("Item {i}"),
                Decimal::new(i as i64 * 250, 3),
                Decimal::new(i as i64 * 9999, 2),
            )
            .discount(dec!(10))
            .build()
        })
        .collect()
}

fn bench_compute_totals(c: &mut Criterion) {
    let ten = build_items(10);
    let hundred = build_items(100);

    c.bench_function("compute_totals_10_lines", |b| {
        b.iter(|| compute_totals(black_box(&ten)).unwrap())
    });

    c.bench_function("compute_totals_100_lines", |b| {
        b.iter(|| compute_totals(black_box(&hundred)).unwrap())
    });
}

fn bench_amount_to_words(c: &mut Criterion) {
    c.bench_function("amount_to_words", |b| {
        b.iter(|| amount_to_words(black_box(dec!(1234567.89))))
    });
}

criterion_group!(benches, bench_compute_totals, bench_amount_to_words);
criterion_main!(benches);
