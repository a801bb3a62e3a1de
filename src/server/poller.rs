//! Background CRM poller.
//!
//! Watches the two pipeline statuses and drives the same generation flow
//! the HTTP API uses. Dedup is the store's explicit lead state — a lead is
//! skipped only when its state for the document kind is `Processed`;
//! failed leads are retried on the next tick. CRM tags are written after
//! success as a human-facing marker only.

use tokio_util::sync::CancellationToken;

use crate::core::{DocumentKind, FatooraError};
use crate::crm::{Product, build_invoice_request, parse_quantity};
use crate::store::LeadProcessingStatus;

use super::flow::generate_and_dispatch;
use super::startup::AppState;

pub struct Poller {
    state: AppState,
}

impl Poller {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Run until the token is cancelled. One tick polls both statuses;
    /// per-lead failures are recorded and never stop the loop.
    pub async fn run(self, shutdown: CancellationToken) {
        let kommo = &self.state.config.kommo;
        if !kommo.poller_enabled {
            tracing::info!("CRM poller disabled by configuration");
            return;
        }

        tracing::info!(
            interval_secs = kommo.poll_interval.as_secs(),
            pipeline_id = kommo.pipeline_id,
            "CRM poller started"
        );

        let mut interval = tokio::time::interval(kommo.poll_interval);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("CRM poller shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.poll_once().await;
                }
            }
        }
    }

    /// One pass over both watched statuses.
    pub async fn poll_once(&self) {
        for kind in [DocumentKind::Proforma, DocumentKind::Tax] {
            if let Err(e) = self.poll_kind(kind).await {
                tracing::warn!(kind = kind.slug(), error = %e, "poll pass failed");
            }
        }
    }

    async fn poll_kind(&self, kind: DocumentKind) -> Result<(), FatooraError> {
        let kommo = &self.state.config.kommo;
        let status_id = match kind {
            DocumentKind::Proforma => kommo.proforma_status_id,
            DocumentKind::Tax => kommo.tax_status_id,
        };

        let leads = self
            .state
            .crm
            .leads_in_status(kommo.pipeline_id, status_id)
            .await?;

        for lead in leads {
            let lead_key = lead.id as i64;

            match self.state.store.lead_status(lead_key, kind).await? {
                Some(LeadProcessingStatus::Processed) => {
                    tracing::debug!(lead_id = lead.id, kind = kind.slug(), "already processed");
                    continue;
                }
                _ => {}
            }

            match self.process_lead(kind, &lead).await {
                Ok(()) => {
                    self.state
                        .store
                        .mark_lead(lead_key, kind, LeadProcessingStatus::Processed, None)
                        .await?;
                    let tag = match kind {
                        DocumentKind::Proforma => "proforma generated",
                        DocumentKind::Tax => "tax invoice generated",
                    };
                    if let Err(e) = self.state.crm.add_tag(lead.id, tag).await {
                        tracing::warn!(lead_id = lead.id, error = %e, "could not tag lead");
                    }
                }
                Err(e) => {
                    tracing::error!(lead_id = lead.id, kind = kind.slug(), error = %e, "lead failed");
                    self.state
                        .store
                        .mark_lead(lead_key, kind, LeadProcessingStatus::Failed, Some(e.to_string()))
                        .await?;
                }
            }
        }

        Ok(())
    }

    async fn process_lead(
        &self,
        kind: DocumentKind,
        lead: &crate::crm::Lead,
    ) -> Result<(), FatooraError> {
        let contact_id = lead.primary_contact_id().ok_or_else(|| {
            FatooraError::Crm(format!("lead {} has no linked contact", lead.id))
        })?;
        let contact = self.state.crm.contact(contact_id).await?;

        let element_refs = lead
            .embedded
            .as_ref()
            .map(|e| e.catalog_elements.as_slice())
            .unwrap_or_default();

        let mut products = Vec::new();
        for element_ref in element_refs {
            let Some(catalog_id) = element_ref.metadata.as_ref().and_then(|m| m.catalog_id) else {
                tracing::warn!(
                    lead_id = lead.id,
                    element_id = element_ref.id,
                    "product link without catalog id, skipping"
                );
                continue;
            };
            let element = self
                .state
                .crm
                .catalog_element(catalog_id, element_ref.id)
                .await?;
            let quantity =
                parse_quantity(element_ref.metadata.as_ref().and_then(|m| m.quantity.as_ref()));
            products.push(Product { element, quantity });
        }

        let request = build_invoice_request(kind, lead, &contact, &products)?;

        if kind == DocumentKind::Proforma {
            self.state.store.upsert_proforma(&request).await?;
        }

        generate_and_dispatch(&self.state, kind, &request).await?;
        Ok(())
    }
}
