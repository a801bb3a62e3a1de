//! MongoDB persistence: proforma records keyed by deal number, plus the
//! explicit lead-processing state that guards the CRM poller.
//!
//! Records store the *raw* request — totals are recomputed from the line
//! items on every read, never cached.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, doc};
use mongodb::options::{IndexOptions, UpdateOptions};
use mongodb::{Client as MongoClient, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::core::{DocumentKind, FatooraError, InvoiceRequest};

const PROFORMA_COLLECTION: &str = "proforma_invoices";
const LEAD_STATE_COLLECTION: &str = "lead_states";

/// A persisted proforma invoice: the raw request plus bookkeeping
/// timestamps, keyed by the CRM deal number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProformaRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub deal_number: String,
    #[serde(flatten)]
    pub request: InvoiceRequest,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Lead-processing state, persisted per (lead, document kind).
///
/// Replaces tag-text matching in the CRM with an explicit at-most-once
/// guard: a lead is only picked up by the poller while its state for the
/// kind is absent, `Pending`, or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadProcessingStatus {
    Pending,
    Processed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadState {
    /// `"{lead_id}:{kind}"` — one state document per lead and kind.
    #[serde(rename = "_id")]
    pub id: String,
    pub lead_id: i64,
    pub kind: DocumentKind,
    pub status: LeadProcessingStatus,
    /// Failure message from the last attempt, if any.
    pub error: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

fn lead_state_id(lead_id: i64, kind: DocumentKind) -> String {
    format!("{lead_id}:{}", kind.slug())
}

/// Outcome of an upsert by deal number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    Created { id: String },
    Updated,
}

impl Upsert {
    pub fn is_new(&self) -> bool {
        matches!(self, Upsert::Created { .. })
    }
}

/// Handle to the invoice database. Cheap to clone; connected once at
/// startup and shut down explicitly.
#[derive(Clone)]
pub struct ProformaStore {
    client: MongoClient,
    db: Database,
}

impl ProformaStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, FatooraError> {
        tracing::info!(database, "connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri)
            .await
            .map_err(|e| FatooraError::Store(format!("cannot connect to MongoDB: {e}")))?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    /// Create the indexes the store relies on. Idempotent.
    pub async fn initialize_indexes(&self) -> Result<(), FatooraError> {
        let deal_index = IndexModel::builder()
            .keys(doc! { "deal_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("deal_number_lookup".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.proformas()
            .create_index(deal_index, None)
            .await
            .map_err(store_err)?;

        let lead_index = IndexModel::builder()
            .keys(doc! { "lead_id": 1 })
            .options(IndexOptions::builder().name("lead_lookup".to_string()).build())
            .build();
        self.lead_states()
            .create_index(lead_index, None)
            .await
            .map_err(store_err)?;

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), FatooraError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    /// Insert or update the proforma record for the request's deal number.
    /// `created_at` is preserved across updates.
    pub async fn upsert_proforma(&self, request: &InvoiceRequest) -> Result<Upsert, FatooraError> {
        let deal_number = request.invoice.deal_number.clone();

        let mut set_doc = bson::to_document(request)
            .map_err(|e| FatooraError::Store(format!("cannot serialize record: {e}")))?;
        set_doc.insert("deal_number", deal_number.as_str());
        set_doc.insert("updated_at", bson::DateTime::now());

        let update = doc! {
            "$set": set_doc,
            "$setOnInsert": { "created_at": bson::DateTime::now() },
        };

        let result = self
            .proformas()
            .update_one(
                doc! { "deal_number": deal_number.as_str() },
                update,
                UpdateOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(store_err)?;

        match result.upserted_id {
            Some(Bson::ObjectId(oid)) => {
                tracing::info!(%deal_number, id = %oid, "created proforma record");
                Ok(Upsert::Created { id: oid.to_hex() })
            }
            Some(other) => Ok(Upsert::Created {
                id: other.to_string(),
            }),
            None => {
                tracing::info!(%deal_number, "updated proforma record");
                Ok(Upsert::Updated)
            }
        }
    }

    pub async fn find_by_deal_number(
        &self,
        deal_number: &str,
    ) -> Result<Option<ProformaRecord>, FatooraError> {
        self.proformas()
            .find_one(doc! { "deal_number": deal_number }, None)
            .await
            .map_err(store_err)
    }

    /// Current processing status for a lead/kind pair, if any attempt was
    /// ever recorded.
    pub async fn lead_status(
        &self,
        lead_id: i64,
        kind: DocumentKind,
    ) -> Result<Option<LeadProcessingStatus>, FatooraError> {
        let state = self
            .lead_states()
            .find_one(doc! { "_id": lead_state_id(lead_id, kind) }, None)
            .await
            .map_err(store_err)?;
        Ok(state.map(|s| s.status))
    }

    /// Record the outcome of a processing attempt for a lead/kind pair.
    pub async fn mark_lead(
        &self,
        lead_id: i64,
        kind: DocumentKind,
        status: LeadProcessingStatus,
        error: Option<String>,
    ) -> Result<(), FatooraError> {
        let state = LeadState {
            id: lead_state_id(lead_id, kind),
            lead_id,
            kind,
            status,
            error,
            updated_at: Utc::now(),
        };
        let state_doc = bson::to_document(&state)
            .map_err(|e| FatooraError::Store(format!("cannot serialize lead state: {e}")))?;

        self.lead_states()
            .update_one(
                doc! { "_id": state.id.as_str() },
                doc! { "$set": state_doc },
                UpdateOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(store_err)?;
        Ok(())
    }

    /// Close the connection pool. Call once on shutdown.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB connection closed");
    }

    fn proformas(&self) -> Collection<ProformaRecord> {
        self.db.collection(PROFORMA_COLLECTION)
    }

    fn lead_states(&self) -> Collection<LeadState> {
        self.db.collection(LEAD_STATE_COLLECTION)
    }
}

fn store_err(e: mongodb::error::Error) -> FatooraError {
    FatooraError::Store(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InvoiceRequestBuilder, LineItemBuilder};
    use rust_decimal_macros::dec;

    fn request() -> InvoiceRequest {
        InvoiceRequestBuilder::new("00PI25-00000042", "June 15, 2026", "42")
            .customer("Jane Doe", "Downtown Dubai")
            .customer_email("jane@example.com")
            .payment_terms("Advance payment of 50% before Delivery")
            .add_item(LineItemBuilder::new("Ring", dec!(1), dec!(1050)).build())
            .recipient("jane@example.com")
            .build_unchecked()
    }

    #[test]
    fn record_serializes_flat_like_the_original_documents() {
        let record = ProformaRecord {
            id: None,
            deal_number: "42".into(),
            request: request(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let doc = bson::to_document(&record).unwrap();
        // Request fields are flattened to the top level next to deal_number.
        assert!(doc.contains_key("deal_number"));
        assert!(doc.contains_key("invoice"));
        assert!(doc.contains_key("items"));
        assert!(doc.contains_key("recipient_emails"));
        assert!(!doc.contains_key("request"));
    }

    #[test]
    fn lead_state_ids_are_per_kind() {
        assert_eq!(lead_state_id(7, DocumentKind::Proforma), "7:proforma");
        assert_eq!(lead_state_id(7, DocumentKind::Tax), "7:tax");
    }

    #[test]
    fn lead_state_roundtrips_through_bson() {
        let state = LeadState {
            id: lead_state_id(9, DocumentKind::Tax),
            lead_id: 9,
            kind: DocumentKind::Tax,
            status: LeadProcessingStatus::Failed,
            error: Some("mail bounced".into()),
            updated_at: Utc::now(),
        };
        let doc = bson::to_document(&state).unwrap();
        let back: LeadState = bson::from_document(doc).unwrap();
        assert_eq!(back.status, LeadProcessingStatus::Failed);
        assert_eq!(back.kind, DocumentKind::Tax);
        assert_eq!(back.error.as_deref(), Some("mail bounced"));
    }
}
