//! # fatoora
//!
//! UAE invoicing service: proforma and tax invoice generation with
//! VAT back-calculation, amount-in-words, CRM-driven dispatch.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Unit prices are VAT-inclusive (UAE retail convention); the tax-exclusive
//! amount is always derived by division, never by forward VAT addition.
//!
//! ## Quick Start
//!
//! ```rust
//! use fatoora::core::*;
//! use rust_decimal_macros::dec;
//!
//! let items = vec![
//!     LineItemBuilder::new("Gold ring", dec!(2), dec!(1050))
//!         .discount(dec!(10))
//!         .build(),
//! ];
//!
//! let computed = compute_totals(&items).unwrap();
//! assert_eq!(computed.totals.total_incl_tax, dec!(1890.00));
//! assert_eq!(computed.totals.total_tax, dec!(90.00));
//! assert!(amount_to_words(computed.totals.total_incl_tax).ends_with("AED ONLY"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Line items, totals calculator, amount-in-words, numbering, validation |
//! | `render` | HTML document rendering (proforma / tax variants) |
//! | `pdf` | HTML→PDF conversion via an external converter |
//! | `store` | MongoDB proforma records & lead-processing state |
//! | `crm` | Kommo CRM client & lead-to-invoice mapping |
//! | `mail` | Email dispatch with PDF attachments |
//! | `server` | HTTP API, auth, background CRM poller |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "render")]
pub mod render;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "crm")]
pub mod crm;

#[cfg(feature = "mail")]
pub mod mail;

#[cfg(feature = "server")]
pub mod server;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
