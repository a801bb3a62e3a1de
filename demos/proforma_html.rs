//! Render a proforma invoice to HTML and write it next to the demo.
//!
//! Run with: `cargo run --example proforma_html --features render`

use fatoora::core::*;
use fatoora::render::render_document;
use rust_decimal_macros::dec;

fn main() {
    let request = InvoiceRequestBuilder::new("00PI25-00012345", "June 15, 2026", "12345")
        .customer("Jane Doe", "Downtown Dubai")
        .customer_trn("100123456700003")
        .customer_email("jane@example.com")
        .payment_terms("Advance payment of 50% before Delivery")
        .amount_paid("5000")
        .add_item(
            LineItemBuilder::new("Gold ring", dec!(2), dec!(1050.00))
                .sub_description("RING-001, 18k, size 7")
                .discount(dec!(10))
                .build(),
        )
        .recipient("jane@example.com")
        .build()
        .expect("demo request is valid");

    let html = render_document(
        DocumentKind::Proforma,
        &request,
        &CompanyProfile::default(),
        &BankDetails::default(),
    )
    .expect("demo request renders");

    let path = "proforma_demo.html";
    std::fs::write(path, html).expect("writable working directory");
    println!("wrote {path}");
}
