//! Donation adapter
//!
//! Donations have no review lifecycle; staff read them in aggregate and
//! can delete individual entries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{now_iso, to_fields};
use crate::config::DONATION_COLLECTION;
use crate::error::Result;
use crate::store::{Document, DocumentStore};

const DATE_FIELD: &str = "date";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub amount: f64,
    pub purpose: String,
    pub message: String,
    pub date: String,
}

impl Donation {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.str_or_default("name"),
            email: doc.str_or_default("email"),
            contact: doc.str_or_default("contact"),
            // non-numeric amounts read as 0 so aggregation stays total
            amount: doc.f64_or_default("amount"),
            purpose: doc.str_or_default("purpose"),
            message: doc.str_or_default("message"),
            date: doc.str_or(DATE_FIELD, now_iso()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub amount: f64,
    pub purpose: String,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// Adapter over the `donations` collection.
#[derive(Clone)]
pub struct DonationStore {
    store: Arc<dyn DocumentStore>,
}

impl DonationStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record a new donation, returning its assigned id.
    pub async fn submit(&self, req: NewDonation) -> Result<String> {
        tracing::info!("Recording donation of {} from {}", req.amount, req.name);

        let mut fields = to_fields(&req)?;
        fields.insert(DATE_FIELD.into(), now_iso().into());

        let id = self.store.add(DONATION_COLLECTION, fields).await?;

        tracing::info!("Donation recorded successfully: {}", id);
        Ok(id)
    }

    /// List all donations, newest first.
    pub async fn list(&self) -> Result<Vec<Donation>> {
        let documents = self.store.list(DONATION_COLLECTION, DATE_FIELD).await?;
        Ok(documents.iter().map(Donation::from_document).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Donation>> {
        let donations = self.list().await?;
        Ok(donations.into_iter().find(|d| d.id == id))
    }

    /// Sum of all donation amounts. Documents with a missing or
    /// non-numeric amount contribute 0.
    pub async fn total_amount(&self) -> Result<f64> {
        let donations = self.list().await?;
        Ok(donations.iter().map(|d| d.amount).sum())
    }

    pub async fn update(&self, id: &str, updates: DonationUpdate) -> Result<()> {
        self.store
            .merge(DONATION_COLLECTION, id, to_fields(&updates)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting donation: {}", id);
        self.store.remove(DONATION_COLLECTION, id).await
    }
}
