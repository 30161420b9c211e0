//! Adoption request adapter
//!
//! Visitors apply to adopt a listed animal; staff review the requests.
//! The animal reference on a request is a soft reference only; nothing
//! at this layer enforces that the animal still exists.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{now_iso, to_fields, Status};
use crate::config::ADOPTION_COLLECTION;
use crate::error::Result;
use crate::store::{Document, DocumentStore, Fields};

const DATE_FIELD: &str = "date";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRequest {
    pub id: String,
    pub animal_id: String,
    pub animal_name: String,
    pub animal_type: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
    pub status: Status,
    pub date: String,
}

impl AdoptionRequest {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            animal_id: doc.str_or_default("animalId"),
            animal_name: doc.str_or_default("animalName"),
            animal_type: doc.str_or_default("animalType"),
            name: doc.str_or_default("name"),
            email: doc.str_or_default("email"),
            contact: doc.str_or_default("contact"),
            address: doc.str_or_default("address"),
            status: Status::parse(&doc.str_or_default("status")),
            date: doc.str_or(DATE_FIELD, now_iso()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdoptionRequest {
    pub animal_id: String,
    pub animal_name: String,
    pub animal_type: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Adapter over the `adoptions` collection.
#[derive(Clone)]
pub struct AdoptionStore {
    store: Arc<dyn DocumentStore>,
}

impl AdoptionStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Submit a new adoption request, returning its assigned id.
    pub async fn submit(&self, req: NewAdoptionRequest) -> Result<String> {
        tracing::info!(
            "Submitting adoption request for {} from {}",
            req.animal_name,
            req.name
        );

        let mut fields = to_fields(&req)?;
        fields.insert("status".into(), Status::Pending.as_str().into());
        fields.insert(DATE_FIELD.into(), now_iso().into());

        let id = self.store.add(ADOPTION_COLLECTION, fields).await?;

        tracing::info!("Adoption request submitted successfully: {}", id);
        Ok(id)
    }

    /// List adoption requests, newest first; filtering is client-side.
    pub async fn list(&self, only_pending: bool) -> Result<Vec<AdoptionRequest>> {
        let documents = self.store.list(ADOPTION_COLLECTION, DATE_FIELD).await?;

        let adoptions: Vec<AdoptionRequest> = documents
            .iter()
            .map(AdoptionRequest::from_document)
            .filter(|a| !only_pending || a.status == Status::Pending)
            .collect();

        tracing::debug!("Adoption requests after filtering: {}", adoptions.len());
        Ok(adoptions)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<AdoptionRequest>> {
        let adoptions = self.list(false).await?;
        Ok(adoptions.into_iter().find(|a| a.id == id))
    }

    /// Staff status transition; writes only the status field.
    pub async fn update_status(&self, id: &str, status: Status) -> Result<()> {
        tracing::info!("Updating adoption request {} status to {}", id, status.as_str());

        let mut fields = Fields::new();
        fields.insert("status".into(), status.as_str().into());
        self.store.merge(ADOPTION_COLLECTION, id, fields).await
    }

    pub async fn update(&self, id: &str, updates: AdoptionUpdate) -> Result<()> {
        self.store
            .merge(ADOPTION_COLLECTION, id, to_fields(&updates)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting adoption request: {}", id);
        self.store.remove(ADOPTION_COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn create_test_store() -> AdoptionStore {
        AdoptionStore::new(Arc::new(MemoryStore::new()))
    }

    fn sample_request(animal: &str) -> NewAdoptionRequest {
        NewAdoptionRequest {
            animal_id: "an-1".to_string(),
            animal_name: animal.to_string(),
            animal_type: "Dog".to_string(),
            name: "Pat".to_string(),
            email: "pat@x.com".to_string(),
            contact: "123".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_defaults_to_pending() {
        let store = create_test_store();

        let id = store.submit(sample_request("Rex")).await.unwrap();

        let request = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(request.animal_name, "Rex");
        assert_eq!(request.status, Status::Pending);
        assert_eq!(request.address, "1 Main St");
    }

    #[tokio::test]
    async fn test_status_transition_and_filter() {
        let store = create_test_store();

        let first = store.submit(sample_request("Rex")).await.unwrap();
        store.submit(sample_request("Milo")).await.unwrap();

        store.update_status(&first, Status::Rejected).await.unwrap();

        let pending = store.list(true).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].animal_name, "Milo");

        let rejected = store.get_by_id(&first).await.unwrap().unwrap();
        assert_eq!(rejected.status, Status::Rejected);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let store = create_test_store();

        let id = store.submit(sample_request("Rex")).await.unwrap();
        store
            .update(
                &id,
                AdoptionUpdate {
                    address: Some("2 Side St".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let request = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(request.address, "2 Side St");
        assert_eq!(request.name, "Pat");
        assert_eq!(request.animal_name, "Rex");
    }

    #[tokio::test]
    async fn test_get_by_id_absent() {
        let store = create_test_store();
        assert!(store.get_by_id("missing").await.unwrap().is_none());
    }
}
