use thiserror::Error;

/// Errors that can occur while generating, persisting, or dispatching invoices.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FatooraError {
    /// One or more request validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Totals arithmetic hit a degenerate input (e.g. a VAT rate of -100%).
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// HTML document rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// The external HTML→PDF converter failed or produced no output.
    #[error("PDF conversion error: {0}")]
    Pdf(String),

    /// Database operation failed.
    #[error("store error: {0}")]
    Store(String),

    /// CRM API call failed or returned an unusable payload.
    #[error("CRM error: {0}")]
    Crm(String),

    /// Email dispatch failed.
    #[error("mail error: {0}")]
    Mail(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A record required by the operation does not exist.
    #[error("{0}")]
    NotFound(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "issued_to.email").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
