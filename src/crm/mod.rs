//! Kommo CRM integration: REST client, custom-field extraction, and
//! mapping lead/contact/product records into invoice requests.
//!
//! Only the calls the generation flow needs are implemented; the CRM is
//! otherwise treated as an opaque collaborator.

mod build;
mod client;
mod fields;

pub use build::{DEFAULT_PROFORMA_TERMS, Product, build_invoice_request};
pub use client::{
    CatalogElement, CatalogElementRef, Contact, ContactRef, CustomField, ElementMetadata,
    KommoClient, Lead, LeadEmbedded, Tag,
};
pub use fields::{
    extract_discount_percent, field_value, field_value_by_code, parse_price, parse_quantity,
};
