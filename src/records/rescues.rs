//! Rescue report adapter
//!
//! Public visitors submit rescue reports, optionally with a photo of the
//! animal; staff review, accept or reject, and delete them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{now_iso, to_fields, Status};
use crate::config::RESCUE_COLLECTION;
use crate::error::Result;
use crate::images::{AttachedImage, ImageSource};
use crate::store::{Document, DocumentStore, Fields};

const DATE_FIELD: &str = "date";

/// A rescue report as shown to the UI. Every field is defaulted, so a
/// partially-written backend document still reads as a complete record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescueReport {
    pub id: String,
    pub user_name: String,
    pub contact_number: String,
    pub email_id: String,
    pub current_location: String,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub image_file_name: Option<String>,
    pub image_upload_error: Option<String>,
    pub status: Status,
    pub date: String,
}

impl RescueReport {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            user_name: doc.str_or_default("userName"),
            contact_number: doc.str_or_default("contactNumber"),
            email_id: doc.str_or_default("emailId"),
            current_location: doc.str_or_default("currentLocation"),
            description: doc.str_or_default("description"),
            image_url: doc.opt_str("imageURL"),
            image_file_name: doc.opt_str("imageFileName"),
            image_upload_error: doc.opt_str("imageUploadError"),
            status: Status::parse(&doc.str_or_default("status")),
            date: doc.str_or(DATE_FIELD, now_iso()),
        }
    }
}

/// Fields supplied by the public submission form.
#[derive(Debug, Clone)]
pub struct NewRescueReport {
    pub user_name: String,
    pub contact_number: String,
    pub email_id: String,
    pub current_location: String,
    pub description: String,
    pub image: Option<ImageSource>,
}

/// Partial update applied by staff; only present fields are written.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Adapter over the `rescues` collection.
#[derive(Clone)]
pub struct RescueStore {
    store: Arc<dyn DocumentStore>,
}

impl RescueStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Submit a new rescue report, returning its assigned id.
    ///
    /// An image attach failure does not block the submission: the report
    /// persists with a null image and the failure reason recorded.
    pub async fn submit(&self, req: NewRescueReport) -> Result<String> {
        tracing::info!("Submitting rescue report from: {}", req.user_name);

        let image = AttachedImage::attach(req.image).await;

        let mut fields = Fields::new();
        fields.insert("userName".into(), req.user_name.into());
        fields.insert("contactNumber".into(), req.contact_number.into());
        fields.insert("emailId".into(), req.email_id.into());
        fields.insert("currentLocation".into(), req.current_location.into());
        fields.insert("description".into(), req.description.into());
        fields.insert("imageURL".into(), image.url.into());
        fields.insert("imageFileName".into(), image.file_name.into());
        fields.insert("imageUploadError".into(), image.upload_error.into());
        fields.insert("status".into(), Status::Pending.as_str().into());
        fields.insert(DATE_FIELD.into(), now_iso().into());

        let id = self.store.add(RESCUE_COLLECTION, fields).await?;

        tracing::info!("Rescue report submitted successfully: {}", id);
        Ok(id)
    }

    /// List all rescue reports, newest first. With `only_pending`, the
    /// full list is fetched and filtered client-side.
    pub async fn list(&self, only_pending: bool) -> Result<Vec<RescueReport>> {
        let documents = self.store.list(RESCUE_COLLECTION, DATE_FIELD).await?;

        let rescues: Vec<RescueReport> = documents
            .iter()
            .map(RescueReport::from_document)
            .filter(|r| !only_pending || r.status == Status::Pending)
            .collect();

        tracing::debug!("Rescue reports after filtering: {}", rescues.len());
        Ok(rescues)
    }

    /// Look up a single report by scanning the full list. Absence is not
    /// an error.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<RescueReport>> {
        let rescues = self.list(false).await?;
        Ok(rescues.into_iter().find(|r| r.id == id))
    }

    /// Staff status transition; writes only the status field.
    pub async fn update_status(&self, id: &str, status: Status) -> Result<()> {
        tracing::info!("Updating rescue report {} status to {}", id, status.as_str());

        let mut fields = Fields::new();
        fields.insert("status".into(), status.as_str().into());
        self.store.merge(RESCUE_COLLECTION, id, fields).await
    }

    /// Merge the given fields into an existing report.
    pub async fn update(&self, id: &str, updates: RescueUpdate) -> Result<()> {
        self.store
            .merge(RESCUE_COLLECTION, id, to_fields(&updates)?)
            .await
    }

    /// Permanently delete a report.
    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting rescue report: {}", id);
        self.store.remove(RESCUE_COLLECTION, id).await
    }
}
