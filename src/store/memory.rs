//! In-process document store
//!
//! Backend stand-in used by unit and integration tests. Implements the
//! same contract as the remote store, including the failure on deleting
//! or merging into a missing id.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentStore, Fields};
use crate::error::{AppError, Result};

/// In-memory document store keyed by collection name.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, fields: Fields) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));

        tracing::debug!("Created document: {}/{}", collection, id);
        Ok(id)
    }

    async fn list(&self, collection: &str, order_by: &str) -> Result<Vec<Document>> {
        let collections = self.collections.lock().unwrap();
        let mut documents = collections.get(collection).cloned().unwrap_or_default();

        // ISO-8601 strings sort lexicographically, so a plain string
        // comparison gives newest-first ordering.
        documents.sort_by(|a, b| {
            let a_key = a.fields.get(order_by).and_then(Value::as_str).unwrap_or("");
            let b_key = b.fields.get(order_by).and_then(Value::as_str).unwrap_or("");
            b_key.cmp(a_key)
        });

        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| {
                AppError::Unknown(format!("No document to update: {}/{}", collection, id))
            })?;

        for (key, value) in fields {
            document.fields.insert(key, value);
        }
        Ok(())
    }

    async fn put(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let documents = collections.entry(collection.to_string()).or_default();

        match documents.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.fields = fields,
            None => documents.push(Document::new(id, fields)),
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let documents = collections.get_mut(collection).ok_or_else(|| {
            AppError::Unknown(format!("No document to delete: {}/{}", collection, id))
        })?;

        let before = documents.len();
        documents.retain(|d| d.id != id);

        if documents.len() == before {
            return Err(AppError::Unknown(format!(
                "No document to delete: {}/{}",
                collection, id
            )));
        }

        tracing::debug!("Deleted document: {}/{}", collection, id);
        Ok(())
    }
}
