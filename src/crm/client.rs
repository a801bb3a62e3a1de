use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::core::FatooraError;

/// Leads per page; the API caps at 250.
const PAGE_LIMIT: u32 = 250;
/// Safety limit on pagination.
const MAX_PAGES: u32 = 10;

/// A CRM lead as returned by `GET /api/v4/leads`.
#[derive(Debug, Clone, Deserialize)]
pub struct Lead {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_fields_values: Option<Vec<CustomField>>,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<LeadEmbedded>,
}

impl Lead {
    pub fn custom_fields(&self) -> Option<&[CustomField]> {
        self.custom_fields_values.as_deref()
    }

    /// First linked contact id, if any.
    pub fn primary_contact_id(&self) -> Option<u64> {
        self.embedded
            .as_ref()
            .and_then(|e| e.contacts.first())
            .map(|c| c.id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadEmbedded {
    #[serde(default)]
    pub contacts: Vec<ContactRef>,
    #[serde(default)]
    pub catalog_elements: Vec<CatalogElementRef>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactRef {
    pub id: u64,
}

/// Product link on a lead; the quantity lives here, not on the catalog
/// element itself.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogElementRef {
    pub id: u64,
    #[serde(default)]
    pub metadata: Option<ElementMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementMetadata {
    #[serde(default)]
    pub catalog_id: Option<u64>,
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A CRM contact.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_fields_values: Option<Vec<CustomField>>,
}

impl Contact {
    pub fn custom_fields(&self) -> Option<&[CustomField]> {
        self.custom_fields_values.as_deref()
    }
}

/// A catalog element (product).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogElement {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_fields_values: Option<Vec<CustomField>>,
}

impl CatalogElement {
    pub fn custom_fields(&self) -> Option<&[CustomField]> {
        self.custom_fields_values.as_deref()
    }
}

/// One custom field entry. Values arrive either as bare scalars or as
/// `{"value": …}` objects depending on the field type.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub field_code: Option<String>,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LeadsPage {
    #[serde(rename = "_embedded", default)]
    embedded: Option<LeadsEmbedded>,
    #[serde(rename = "_links", default)]
    links: Option<PageLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct LeadsEmbedded {
    #[serde(default)]
    leads: Vec<Lead>,
}

#[derive(Debug, Deserialize)]
struct PageLinks {
    #[serde(default)]
    next: Option<serde_json::Value>,
}

/// Kommo REST v4 client (bearer token, account subdomain).
#[derive(Clone)]
pub struct KommoClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl KommoClient {
    pub fn new(subdomain: &str, token: impl Into<String>) -> Result<Self, FatooraError> {
        Self::with_base_url(format!("https://{subdomain}.kommo.com/api/v4"), token)
    }

    /// Client against an explicit base URL (tests, self-hosted gateways).
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, FatooraError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FatooraError::Crm(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Fetch all leads sitting in one pipeline status, paginated.
    pub async fn leads_in_status(
        &self,
        pipeline_id: u64,
        status_id: u64,
    ) -> Result<Vec<Lead>, FatooraError> {
        let url = format!("{}/leads", self.base_url);
        let mut all_leads = Vec::new();

        for page in 1..=MAX_PAGES {
            let query = [
                ("filter[pipeline_id]", pipeline_id.to_string()),
                ("filter[statuses][0][pipeline_id]", pipeline_id.to_string()),
                ("filter[statuses][0][status_id]", status_id.to_string()),
                ("with", "contacts,catalog_elements,tags".to_string()),
                ("limit", PAGE_LIMIT.to_string()),
                ("page", page.to_string()),
            ];

            let Some(body) = self.get_json::<LeadsPage>(&url, &query).await? else {
                break; // 204 — no more leads
            };

            let leads = body.embedded.unwrap_or_default().leads;
            if leads.is_empty() {
                break;
            }
            tracing::debug!(page, count = leads.len(), status_id, "fetched leads page");
            all_leads.extend(leads);

            let has_next = body.links.is_some_and(|l| l.next.is_some());
            if !has_next {
                break;
            }
        }

        tracing::info!(count = all_leads.len(), status_id, "leads in status");
        Ok(all_leads)
    }

    pub async fn contact(&self, id: u64) -> Result<Contact, FatooraError> {
        let url = format!("{}/contacts/{id}", self.base_url);
        self.get_json(&url, &[])
            .await?
            .ok_or_else(|| FatooraError::Crm(format!("contact {id} not found")))
    }

    pub async fn catalog_element(
        &self,
        catalog_id: u64,
        element_id: u64,
    ) -> Result<CatalogElement, FatooraError> {
        let url = format!("{}/catalogs/{catalog_id}/elements/{element_id}", self.base_url);
        self.get_json(&url, &[])
            .await?
            .ok_or_else(|| FatooraError::Crm(format!("catalog element {element_id} not found")))
    }

    /// Add a tag to a lead, preserving its existing tags.
    ///
    /// The tag is a human-facing marker only; processing dedup lives in
    /// the store's lead state, not in tag text.
    pub async fn add_tag(&self, lead_id: u64, tag_name: &str) -> Result<(), FatooraError> {
        let url = format!("{}/leads/{lead_id}", self.base_url);
        let lead: Lead = self
            .get_json(&url, &[])
            .await?
            .ok_or_else(|| FatooraError::Crm(format!("lead {lead_id} not found")))?;

        let mut tags: Vec<serde_json::Value> = lead
            .embedded
            .map(|e| e.tags)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| match (tag.id, tag.name) {
                (Some(id), _) => Some(json!({ "id": id })),
                (None, Some(name)) => Some(json!({ "name": name })),
                (None, None) => None,
            })
            .collect();
        tags.push(json!({ "name": tag_name }));

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "_embedded": { "tags": tags } }))
            .send()
            .await
            .map_err(|e| FatooraError::Crm(format!("tag update failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FatooraError::Crm(format!(
                "tag update failed: HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// GET returning `Ok(None)` on 204/empty bodies (the API's way of
    /// saying "no results").
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, FatooraError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| FatooraError::Crm(format!("request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = response
            .text()
            .await
            .map_err(|e| FatooraError::Crm(format!("cannot read response: {e}")))?;
        if !status.is_success() {
            return Err(FatooraError::Crm(format!("HTTP {status}: {body}")));
        }
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| FatooraError::Crm(format!("cannot parse response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAD_JSON: &str = r#"{
        "id": 12345,
        "name": "Gold ring for Jane",
        "custom_fields_values": [
            {"field_name": "Delivery address", "values": [{"value": "Downtown Dubai"}]},
            {"field_name": "Discount", "values": [{"value": "10%"}]}
        ],
        "_embedded": {
            "contacts": [{"id": 777}],
            "catalog_elements": [
                {"id": 501, "metadata": {"catalog_id": 9001, "quantity": 2}}
            ],
            "tags": [{"id": 31, "name": "vip"}]
        }
    }"#;

    #[test]
    fn lead_deserializes_with_embedded_links() {
        let lead: Lead = serde_json::from_str(LEAD_JSON).unwrap();
        assert_eq!(lead.id, 12345);
        assert_eq!(lead.primary_contact_id(), Some(777));
        let embedded = lead.embedded.unwrap();
        assert_eq!(embedded.catalog_elements[0].id, 501);
        assert_eq!(
            embedded.catalog_elements[0]
                .metadata
                .as_ref()
                .unwrap()
                .catalog_id,
            Some(9001)
        );
        assert_eq!(embedded.tags[0].name.as_deref(), Some("vip"));
    }

    #[test]
    fn leads_page_detects_pagination() {
        let page: LeadsPage = serde_json::from_str(
            r#"{"_embedded":{"leads":[{"id":1}]},"_links":{"next":{"href":"https://x/leads?page=2"}}}"#,
        )
        .unwrap();
        assert_eq!(page.embedded.unwrap().leads.len(), 1);
        assert!(page.links.unwrap().next.is_some());

        let last: LeadsPage = serde_json::from_str(r#"{"_embedded":{"leads":[{"id":2}]}}"#).unwrap();
        assert!(last.links.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = KommoClient::with_base_url("https://acme.kommo.com/api/v4/", "t").unwrap();
        assert_eq!(client.base_url, "https://acme.kommo.com/api/v4");
    }
}
