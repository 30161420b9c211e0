//! Animal listing adapter
//!
//! Staff list animals available for adoption. Listings carry an inline
//! encoded image; the UI may hand over a pre-compressed data URL instead
//! of a file.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{now_iso, to_fields};
use crate::config::ANIMALS_COLLECTION;
use crate::error::Result;
use crate::images::{AttachedImage, ImageSource};
use crate::store::{Document, DocumentStore, Fields};

const DATE_FIELD: &str = "dateAdded";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalListing {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub animal_type: String,
    pub age: String,
    pub gender: String,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub image_file_name: Option<String>,
    pub image_upload_error: Option<String>,
    pub date_added: String,
}

impl AnimalListing {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.str_or_default("name"),
            animal_type: doc.str_or_default("type"),
            age: doc.str_or_default("age"),
            gender: doc.str_or_default("gender"),
            description: doc.str_or_default("description"),
            image_url: doc.opt_str("imageURL"),
            image_file_name: doc.opt_str("imageFileName"),
            image_upload_error: doc.opt_str("imageUploadError"),
            date_added: doc.str_or(DATE_FIELD, now_iso()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAnimalListing {
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub gender: String,
    pub description: String,
    pub image: Option<ImageSource>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub animal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Adapter over the `animals` collection.
#[derive(Clone)]
pub struct AnimalStore {
    store: Arc<dyn DocumentStore>,
}

impl AnimalStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Add an animal listing, returning its assigned id. Image attach
    /// failure is recorded on the listing, never fatal.
    pub async fn add(&self, req: NewAnimalListing) -> Result<String> {
        tracing::info!("Adding animal listing: {}", req.name);

        let image = AttachedImage::attach(req.image).await;

        let mut fields = Fields::new();
        fields.insert("name".into(), req.name.into());
        fields.insert("type".into(), req.animal_type.into());
        fields.insert("age".into(), req.age.into());
        fields.insert("gender".into(), req.gender.into());
        fields.insert("description".into(), req.description.into());
        fields.insert("imageURL".into(), image.url.into());
        fields.insert("imageFileName".into(), image.file_name.into());
        fields.insert("imageUploadError".into(), image.upload_error.into());
        fields.insert(DATE_FIELD.into(), now_iso().into());

        let id = self.store.add(ANIMALS_COLLECTION, fields).await?;

        tracing::info!("Animal listing added successfully: {}", id);
        Ok(id)
    }

    /// List all animals, newest first.
    pub async fn list(&self) -> Result<Vec<AnimalListing>> {
        let documents = self.store.list(ANIMALS_COLLECTION, DATE_FIELD).await?;
        Ok(documents.iter().map(AnimalListing::from_document).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<AnimalListing>> {
        let animals = self.list().await?;
        Ok(animals.into_iter().find(|a| a.id == id))
    }

    pub async fn update(&self, id: &str, updates: AnimalUpdate) -> Result<()> {
        tracing::info!("Updating animal listing: {}", id);
        self.store
            .merge(ANIMALS_COLLECTION, id, to_fields(&updates)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting animal listing: {}", id);
        self.store.remove(ANIMALS_COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn create_test_store() -> AnimalStore {
        AnimalStore::new(Arc::new(MemoryStore::new()))
    }

    fn sample_listing(name: &str) -> NewAnimalListing {
        NewAnimalListing {
            name: name.to_string(),
            animal_type: "Cat".to_string(),
            age: "2".to_string(),
            gender: "Female".to_string(),
            description: "Friendly".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let store = create_test_store();

        let id = store.add(sample_listing("Bella")).await.unwrap();

        let animals = store.list().await.unwrap();
        assert_eq!(animals.len(), 1);
        assert_eq!(animals[0].id, id);
        assert_eq!(animals[0].animal_type, "Cat");
        assert!(animals[0].image_url.is_none());
    }

    #[tokio::test]
    async fn test_add_with_precompressed_image() {
        let store = create_test_store();

        let mut listing = sample_listing("Bella");
        listing.image = Some(ImageSource::DataUrl("data:image/png;base64,AAAA".into()));

        let id = store.add(listing).await.unwrap();

        let animal = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(animal.image_url.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(animal.image_upload_error.is_none());
    }

    #[tokio::test]
    async fn test_add_with_failing_image_still_succeeds() {
        let store = create_test_store();

        let mut listing = sample_listing("Bella");
        listing.image = Some(ImageSource::File("/no/such/bella.png".into()));

        let id = store.add(listing).await.unwrap();

        let animal = store.get_by_id(&id).await.unwrap().unwrap();
        assert!(animal.image_url.is_none());
        assert!(animal.image_upload_error.is_some());
    }

    #[tokio::test]
    async fn test_update_listing() {
        let store = create_test_store();

        let id = store.add(sample_listing("Bella")).await.unwrap();
        store
            .update(
                &id,
                AnimalUpdate {
                    age: Some("3".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let animal = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(animal.age, "3");
        assert_eq!(animal.name, "Bella");
    }
}
