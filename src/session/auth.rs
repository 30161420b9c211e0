//! Remote authentication service client
//!
//! Email/password sign-in and sign-up against the managed auth service.
//! The service returns a stable per-account identifier; profile data
//! lives in the `users` collection keyed by that identifier.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A successfully authenticated account.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthAccount {
    pub uid: String,
}

/// The authentication service seam.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthAccount>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthAccount>;
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// REST client for the managed auth service.
#[derive(Clone)]
pub struct HttpAuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, credentials: Credentials<'_>) -> Result<AuthAccount> {
        let response = self
            .client
            .post(format!("{}/v1/auth/{}", self.base_url, path))
            .json(&credentials)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AppError::Unavailable(e.to_string())
                } else {
                    AppError::Http(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response.text().await.unwrap_or_default();
        Err(classify_auth_failure(status, &message))
    }
}

/// Credential problems become a rejection with a readable reason; only
/// service outages report as unavailable.
fn classify_auth_failure(status: StatusCode, message: &str) -> AppError {
    let message = if message.is_empty() {
        "Invalid email or password".to_string()
    } else {
        message.to_string()
    };

    match status {
        s if s.is_server_error() => AppError::Unavailable(message),
        StatusCode::TOO_MANY_REQUESTS => AppError::Unavailable(message),
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::CONFLICT => AppError::InvalidCredentials(message),
        _ => AppError::Unknown(message),
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthAccount> {
        tracing::info!("Signing in: {}", email);
        self.post("sign-in", Credentials { email, password }).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthAccount> {
        tracing::info!("Creating account: {}", email);
        self.post("sign-up", Credentials { email, password }).await
    }
}
