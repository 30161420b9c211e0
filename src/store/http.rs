//! Remote document backend client
//!
//! Thin REST client over the managed document store. Each trait method is
//! one request; HTTP failures are classified into the backend error
//! taxonomy so callers can show a differentiated message.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{Document, DocumentStore, Fields};
use crate::error::{AppError, Result};

/// REST client for the managed document backend.
#[derive(Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of a single document.
#[derive(Deserialize)]
struct DocumentPayload {
    id: String,
    #[serde(default)]
    fields: Fields,
}

/// Response to a create request.
#[derive(Deserialize)]
struct CreatedPayload {
    id: String,
}

impl HttpStore {
    /// Create a client for the backend at `base_url`, authenticating
    /// every request with the project API key.
    pub fn new(base_url: impl Into<String>, api_key: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut key = reqwest::header::HeaderValue::from_str(api_key)
            .map_err(|e| AppError::Unknown(format!("Invalid API key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/v1/{}", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/v1/{}/{}", self.base_url, collection, id)
    }

    /// Turn a non-success response into a classified error.
    async fn fail(response: reqwest::Response) -> AppError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        classify_status(status, &message)
    }
}

/// Map an HTTP status to the backend error taxonomy.
fn classify_status(status: StatusCode, message: &str) -> AppError {
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        message.to_string()
    };

    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthenticated(message),
        StatusCode::FORBIDDEN => AppError::PermissionDenied(message),
        StatusCode::TOO_MANY_REQUESTS => AppError::Unavailable(message),
        s if s.is_server_error() => AppError::Unavailable(message),
        _ => AppError::Unknown(message),
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn add(&self, collection: &str, fields: Fields) -> Result<String> {
        tracing::debug!("Adding document to collection: {}", collection);

        let response = self
            .client
            .post(self.collection_url(collection))
            .json(&fields)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let created: CreatedPayload = response.json().await?;
        tracing::debug!("Document created: {}/{}", collection, created.id);
        Ok(created.id)
    }

    async fn list(&self, collection: &str, order_by: &str) -> Result<Vec<Document>> {
        tracing::debug!("Listing collection: {} ordered by {}", collection, order_by);

        let response = self
            .client
            .get(self.collection_url(collection))
            .query(&[("orderBy", order_by), ("direction", "desc")])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let documents: Vec<DocumentPayload> = response.json().await?;
        tracing::debug!("Fetched {} documents from {}", documents.len(), collection);

        Ok(documents
            .into_iter()
            .map(|d| Document::new(d.id, d.fields))
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let response = self
            .client
            .get(self.document_url(collection, id))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let payload: DocumentPayload = response.json().await?;
        Ok(Some(Document::new(payload.id, payload.fields)))
    }

    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        tracing::debug!("Merging fields into {}/{}", collection, id);

        let response = self
            .client
            .patch(self.document_url(collection, id))
            .json(&fields)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        Ok(())
    }

    async fn put(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        tracing::debug!("Writing document {}/{}", collection, id);

        let response = self
            .client
            .put(self.document_url(collection, id))
            .json(&fields)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<()> {
        tracing::debug!("Deleting document {}/{}", collection, id);

        let response = self
            .client
            .delete(self.document_url(collection, id))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        Ok(())
    }
}

/// Connection-level failures mean the backend is unreachable, which the
/// taxonomy reports as `unavailable`.
fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_connect() || e.is_timeout() {
        AppError::Unavailable(e.to_string())
    } else {
        AppError::Http(e)
    }
}
