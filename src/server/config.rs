//! Environment-driven configuration with development defaults.
//!
//! Every collaborator (store, CRM, mail, PDF, issuer identity) is
//! configured here and injected at startup — no module-level singletons.
//! In production (`ENVIRONMENT=prod`) secrets have no defaults and must
//! be set.

use std::env;
use std::time::Duration;

use crate::core::{BankDetails, CompanyProfile, FatooraError};
use crate::pdf::{HTML_PLACEHOLDER, PDF_PLACEHOLDER, PdfConverter};

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    /// Shared secret expected in the Authorization header.
    pub api_token: String,
    pub mongo: MongoConfig,
    pub kommo: KommoConfig,
    pub mail: MailConfig,
    pub pdf: PdfSettings,
    pub company: CompanyProfile,
    pub bank: BankDetails,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct KommoConfig {
    pub subdomain: String,
    pub access_token: String,
    pub pipeline_id: u64,
    /// "Generate pro forma" pipeline status.
    pub proforma_status_id: u64,
    /// "Generate tax invoice" pipeline status.
    pub tax_status_id: u64,
    pub poll_interval: Duration,
    pub poller_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub from_email: String,
}

#[derive(Debug, Clone)]
pub struct PdfSettings {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl PdfSettings {
    pub fn converter(&self) -> PdfConverter {
        PdfConverter::new(self.program.clone(), self.args.clone(), self.timeout)
    }
}

impl Config {
    pub fn load() -> Result<Self, FatooraError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let is_prod = environment == "prod";

        let pdf_command = get_env(
            "PDF_COMMAND",
            Some(&format!("weasyprint {HTML_PLACEHOLDER} {PDF_PLACEHOLDER}")),
            false,
        )?;
        let mut pdf_parts = pdf_command.split_whitespace().map(String::from);
        let pdf_program = pdf_parts
            .next()
            .ok_or_else(|| FatooraError::Config("PDF_COMMAND must not be empty".into()))?;

        Ok(Config {
            port: parse_env("PORT", Some("8000"), is_prod)?,
            api_token: get_env("API_SECRET_TOKEN", Some("dev-token"), is_prod)?,
            mongo: MongoConfig {
                uri: get_env("MONGO_URL", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGO_DATABASE", Some("invoices_db"), is_prod)?,
            },
            kommo: KommoConfig {
                subdomain: get_env("KOMMO_SUBDOMAIN", Some("example"), is_prod)?,
                access_token: get_env("KOMMO_ACCESS_TOKEN", Some("dev-token"), is_prod)?,
                pipeline_id: parse_env("KOMMO_PIPELINE_ID", Some("11307791"), is_prod)?,
                proforma_status_id: parse_env(
                    "KOMMO_PROFORMA_STATUS_ID",
                    Some("94720975"),
                    is_prod,
                )?,
                tax_status_id: parse_env("KOMMO_TAX_STATUS_ID", Some("95171727"), is_prod)?,
                poll_interval: Duration::from_secs(parse_env(
                    "POLL_INTERVAL_SECS",
                    Some("300"),
                    false,
                )?),
                poller_enabled: parse_env("POLLER_ENABLED", Some("true"), false)?,
            },
            mail: MailConfig {
                api_key: get_env("RESEND_API_KEY", Some("dev-key"), is_prod)?,
                from_email: get_env("FROM_EMAIL", Some("invoices@example.com"), is_prod)?,
            },
            pdf: PdfSettings {
                program: pdf_program,
                args: pdf_parts.collect(),
                timeout: Duration::from_secs(parse_env("PDF_TIMEOUT_SECS", Some("60"), false)?),
            },
            company: CompanyProfile {
                name: override_or("COMPANY_NAME", CompanyProfile::default().name),
                address: override_or("COMPANY_ADDRESS", CompanyProfile::default().address),
                trn: override_or("COMPANY_TRN", CompanyProfile::default().trn),
                tel: override_or("COMPANY_TEL", CompanyProfile::default().tel),
                email: override_or("COMPANY_EMAIL", CompanyProfile::default().email),
            },
            bank: BankDetails {
                bank_name: override_or("BANK_NAME", BankDetails::default().bank_name),
                iban: override_or("BANK_IBAN", BankDetails::default().iban),
                swift: override_or("BANK_SWIFT", BankDetails::default().swift),
                beneficiary: override_or("BANK_BENEFICIARY", BankDetails::default().beneficiary),
            },
            environment,
        })
    }
}

fn override_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn get_env(key: &str, default: Option<&str>, required: bool) -> Result<String, FatooraError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) if required => Err(FatooraError::Config(format!(
            "{key} is required in production but not set"
        ))),
        Err(_) => default.map(String::from).ok_or_else(|| {
            FatooraError::Config(format!("{key} is required but not set"))
        }),
    }
}

fn parse_env<T>(key: &str, default: Option<&str>, required: bool) -> Result<T, FatooraError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, default, required)?
        .parse()
        .map_err(|e| FatooraError::Config(format!("{key} is invalid: {e}")))
}
