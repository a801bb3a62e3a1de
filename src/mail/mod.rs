//! Email dispatch through a Resend-style HTTP API.
//!
//! One message per recipient, PDF attached base64-encoded. The body is a
//! short HTML summary; the document itself travels as the attachment.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::core::format::format_amount;
use crate::core::numbering::number_slug;
use crate::core::{CompanyProfile, DocumentKind, FatooraError, InvoiceRequest, InvoiceTotals};

const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    html: String,
    attachments: Vec<Attachment<'a>>,
}

#[derive(Debug, Serialize)]
struct Attachment<'a> {
    filename: &'a str,
    /// Base64-encoded file body.
    content: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Delivery receipt for one recipient.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub message_id: Option<String>,
}

/// HTTP email API client.
#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl Mailer {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Result<Self, FatooraError> {
        Self::with_api_url(DEFAULT_API_URL, api_key, from)
    }

    pub fn with_api_url(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, FatooraError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FatooraError::Mail(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        })
    }

    /// Send the finished document to every recipient on the request.
    /// Fails on the first undeliverable recipient — partial sends are
    /// reported in the error message.
    pub async fn send_document(
        &self,
        kind: DocumentKind,
        request: &InvoiceRequest,
        totals: &InvoiceTotals,
        company: &CompanyProfile,
        pdf: &[u8],
    ) -> Result<Vec<SentMail>, FatooraError> {
        let filename = format!(
            "{}_{}.pdf",
            kind.attachment_prefix(),
            number_slug(&request.invoice.number)
        );
        let encoded = BASE64.encode(pdf);
        let subject = format!(
            "{} {} - {}",
            kind.subject_prefix(),
            request.invoice.number,
            request.issued_to.name
        );
        let html = body_html(kind, request, totals, company);

        let mut sent = Vec::new();
        for recipient in &request.recipient_emails {
            let payload = SendRequest {
                from: &self.from,
                to: vec![recipient.as_str()],
                subject: subject.clone(),
                html: html.clone(),
                attachments: vec![Attachment {
                    filename: &filename,
                    content: encoded.clone(),
                }],
            };

            let response = self
                .http
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await
                .map_err(|e| partial_failure(&sent, recipient, &e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(partial_failure(
                    &sent,
                    recipient,
                    &format!("HTTP {status}: {body}"),
                ));
            }

            let receipt: SendResponse = response
                .json()
                .await
                .unwrap_or(SendResponse { id: None });

            tracing::info!(%recipient, message_id = ?receipt.id, "email sent");
            sent.push(SentMail {
                recipient: recipient.clone(),
                message_id: receipt.id,
            });
        }

        Ok(sent)
    }
}

fn partial_failure(sent: &[SentMail], recipient: &str, reason: &str) -> FatooraError {
    FatooraError::Mail(format!(
        "sending to {recipient} failed after {} successful deliveries: {reason}",
        sent.len()
    ))
}

fn body_html(
    kind: DocumentKind,
    request: &InvoiceRequest,
    totals: &InvoiceTotals,
    company: &CompanyProfile,
) -> String {
    let deal_line = match kind {
        DocumentKind::Tax => format!(
            "<strong>Deal Number:</strong> {}<br/>",
            request.invoice.deal_number
        ),
        DocumentKind::Proforma => String::new(),
    };

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">{title}</h2>
  <p>Dear {name},</p>
  <p>Please find attached your {document}.</p>
  <div style="background: #f5f5f5; padding: 15px; border-radius: 5px; margin: 20px 0;">
    <strong>Invoice Number:</strong> {number}<br/>
    <strong>Date of Issuing:</strong> {date}<br/>
    {deal_line}<strong>Total Amount (AED):</strong> {total}<br/>
  </div>
  <p>Thank you for your business.</p>
  <hr style="border: none; border-top: 1px solid #ddd; margin: 20px 0;" />
  <p style="color: #666; font-size: 12px;">
    <strong>{company_name}</strong><br/>
    {company_address}<br/>
    TRN: {company_trn}
  </p>
</div>"#,
        title = kind.subject_prefix(),
        name = request.issued_to.name,
        document = kind.subject_prefix().to_lowercase(),
        number = request.invoice.number,
        date = request.invoice.date_of_issuing,
        deal_line = deal_line,
        total = format_amount(totals.total_incl_tax),
        company_name = company.name,
        company_address = company.address,
        company_trn = company.trn,
    )
}
