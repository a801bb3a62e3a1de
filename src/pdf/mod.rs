//! HTML→PDF conversion by driving an external converter binary.
//!
//! Rendering internals stay outside the process: the converter program and
//! argument template are configuration, the contract is "HTML file in,
//! non-empty PDF file out within the timeout".

use std::path::Path;
use std::time::Duration;

use tokio::process::Command;

use crate::core::FatooraError;
use crate::core::numbering::number_slug;

/// Default converter invocation: `weasyprint <html> <pdf>`.
pub const DEFAULT_PROGRAM: &str = "weasyprint";

/// Placeholders substituted into the configured argument template.
pub const HTML_PLACEHOLDER: &str = "{html}";
pub const PDF_PLACEHOLDER: &str = "{pdf}";

/// Converts rendered HTML documents to PDF via an external program.
#[derive(Debug, Clone)]
pub struct PdfConverter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for PdfConverter {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROGRAM,
            vec![HTML_PLACEHOLDER.into(), PDF_PLACEHOLDER.into()],
            Duration::from_secs(60),
        )
    }
}

impl PdfConverter {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Convert `html` to PDF bytes. `document_number` names the scratch
    /// files so converter logs stay attributable.
    pub async fn convert(&self, html: &str, document_number: &str) -> Result<Vec<u8>, FatooraError> {
        let dir = tempfile::tempdir()
            .map_err(|e| FatooraError::Pdf(format!("cannot create scratch directory: {e}")))?;

        let slug = number_slug(document_number);
        let html_path = dir.path().join(format!("{slug}.html"));
        let pdf_path = dir.path().join(format!("{slug}.pdf"));

        tokio::fs::write(&html_path, html)
            .await
            .map_err(|e| FatooraError::Pdf(format!("cannot write HTML input: {e}")))?;

        self.run_converter(&html_path, &pdf_path).await?;

        let bytes = tokio::fs::read(&pdf_path)
            .await
            .map_err(|e| FatooraError::Pdf(format!("converter produced no output file: {e}")))?;
        if bytes.is_empty() {
            return Err(FatooraError::Pdf("converter produced an empty PDF".into()));
        }

        tracing::debug!(
            document_number,
            pdf_size_kb = bytes.len() / 1024,
            "PDF generated"
        );
        Ok(bytes)
    }

    async fn run_converter(&self, html_path: &Path, pdf_path: &Path) -> Result<(), FatooraError> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                a.replace(HTML_PLACEHOLDER, &html_path.to_string_lossy())
                    .replace(PDF_PLACEHOLDER, &pdf_path.to_string_lossy())
            })
            .collect();

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        tracing::debug!(program = %self.program, ?args, "running PDF converter");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                FatooraError::Pdf(format!(
                    "converter timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| FatooraError::Pdf(format!("cannot spawn '{}': {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FatooraError::Pdf(format!(
                "converter exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
