//! Document store boundary
//!
//! This module provides the contract over the managed document backend:
//! - `Document`: a raw backend document plus defaulting accessors
//! - `DocumentStore`: the async trait every backend implements
//! - `HttpStore`: the real remote backend client
//! - `MemoryStore`: an in-process store used by tests

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

/// Field map of a backend document.
pub type Fields = Map<String, Value>;

/// A raw document as returned by the backend.
///
/// Backend documents are dynamically shaped; callers must go through the
/// defaulting accessors rather than trusting a field to be present.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// String field, empty string when absent or not a string.
    pub fn str_or_default(&self, key: &str) -> String {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Optional string field; absent, null and non-string all map to `None`.
    pub fn opt_str(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Boolean field, `false` when absent.
    pub fn bool_or_default(&self, key: &str) -> bool {
        self.fields
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Numeric field, `0.0` when absent or non-numeric.
    pub fn f64_or_default(&self, key: &str) -> f64 {
        self.fields.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// String field, falling back to the given value when absent.
    pub fn str_or(&self, key: &str, fallback: impl Into<String>) -> String {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| fallback.into())
    }
}

/// Uniform contract over a named backend collection.
///
/// Every operation is a single network round trip. Failures surface once,
/// immediately; there are no retries and no client-side timeouts.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document; the store assigns and returns its id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String>;

    /// Fetch every document in the collection, ordered by the named
    /// ISO-8601 string field, newest first.
    async fn list(&self, collection: &str, order_by: &str) -> Result<Vec<Document>>;

    /// Point lookup of a single document.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Merge the given fields into an existing document, leaving all
    /// other fields untouched. Fails when the id does not exist.
    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Write a full document at a caller-chosen id, replacing any
    /// existing content.
    async fn put(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Permanently delete a document. Deleting an id that does not exist
    /// fails rather than no-ops, mirroring the underlying store.
    async fn remove(&self, collection: &str, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: Value) -> Document {
        let Value::Object(map) = fields else {
            panic!("fields must be an object")
        };
        Document::new("d1", map)
    }

    #[test]
    fn test_defaulting_accessors() {
        let d = doc(json!({
            "name": "Bella",
            "answered": true,
            "amount": 25.5,
            "answer": null,
        }));

        assert_eq!(d.str_or_default("name"), "Bella");
        assert_eq!(d.str_or_default("missing"), "");
        assert_eq!(d.opt_str("answer"), None);
        assert_eq!(d.opt_str("name").as_deref(), Some("Bella"));
        assert!(d.bool_or_default("answered"));
        assert!(!d.bool_or_default("missing"));
        assert_eq!(d.f64_or_default("amount"), 25.5);
        assert_eq!(d.f64_or_default("missing"), 0.0);
        assert_eq!(d.str_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_non_numeric_amount_defaults_to_zero() {
        let d = doc(json!({ "amount": "bad" }));
        assert_eq!(d.f64_or_default("amount"), 0.0);
    }
}
