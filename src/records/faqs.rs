//! FAQ adapter
//!
//! Visitors ask questions; staff answer, edit or remove them. Answering
//! sets the answer text, the answered flag and the answer timestamp in a
//! single merged write.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{now_iso, to_fields};
use crate::config::FAQ_COLLECTION;
use crate::error::Result;
use crate::store::{Document, DocumentStore, Fields};

const DATE_FIELD: &str = "date";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    pub id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_contact: String,
    pub user_question: String,
    pub answered: bool,
    pub answer: Option<String>,
    pub answered_date: Option<String>,
    pub date: String,
}

impl FaqEntry {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            user_name: doc.str_or_default("userName"),
            user_email: doc.str_or_default("userEmail"),
            user_contact: doc.str_or_default("userContact"),
            user_question: doc.str_or_default("userQuestion"),
            answered: doc.bool_or_default("answered"),
            answer: doc.opt_str("answer"),
            answered_date: doc.opt_str("answeredDate"),
            date: doc.str_or(DATE_FIELD, now_iso()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFaqQuestion {
    pub user_name: String,
    pub user_email: String,
    pub user_contact: String,
    pub user_question: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// Adapter over the `faqs` collection.
#[derive(Clone)]
pub struct FaqStore {
    store: Arc<dyn DocumentStore>,
}

impl FaqStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Submit a new question, returning its assigned id.
    pub async fn submit(&self, req: NewFaqQuestion) -> Result<String> {
        tracing::info!("Submitting FAQ question from: {}", req.user_name);

        let mut fields = to_fields(&req)?;
        fields.insert("answered".into(), false.into());
        fields.insert("answer".into(), serde_json::Value::Null);
        fields.insert("answeredDate".into(), serde_json::Value::Null);
        fields.insert(DATE_FIELD.into(), now_iso().into());

        let id = self.store.add(FAQ_COLLECTION, fields).await?;

        tracing::info!("FAQ question submitted successfully: {}", id);
        Ok(id)
    }

    /// List questions, newest first; filtering is client-side.
    pub async fn list(&self, only_unanswered: bool) -> Result<Vec<FaqEntry>> {
        let documents = self.store.list(FAQ_COLLECTION, DATE_FIELD).await?;

        let faqs: Vec<FaqEntry> = documents
            .iter()
            .map(FaqEntry::from_document)
            .filter(|f| !only_unanswered || !f.answered)
            .collect();

        tracing::debug!("FAQ questions after filtering: {}", faqs.len());
        Ok(faqs)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<FaqEntry>> {
        let faqs = self.list(false).await?;
        Ok(faqs.into_iter().find(|f| f.id == id))
    }

    /// Record an answer: answer text, answered flag and answer timestamp
    /// land in one merged write.
    pub async fn answer(&self, id: &str, answer: &str) -> Result<()> {
        tracing::info!("Answering FAQ question: {}", id);

        let mut fields = Fields::new();
        fields.insert("answer".into(), answer.into());
        fields.insert("answered".into(), true.into());
        fields.insert("answeredDate".into(), now_iso().into());
        self.store.merge(FAQ_COLLECTION, id, fields).await
    }

    pub async fn update(&self, id: &str, updates: FaqUpdate) -> Result<()> {
        self.store
            .merge(FAQ_COLLECTION, id, to_fields(&updates)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting FAQ question: {}", id);
        self.store.remove(FAQ_COLLECTION, id).await
    }
}
