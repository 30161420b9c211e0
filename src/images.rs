//! Image attachment encoding
//!
//! Images are not uploaded to blob storage; they are encoded as base64
//! data URLs and stored inline in the document. An attach failure never
//! blocks record creation: the record persists with a null image and the
//! failure reason recorded instead.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::fs;

use crate::config::MAX_IMAGE_BYTES;
use crate::error::{AppError, Result};

/// An image handed to a create operation.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Read and encode the file at this path.
    File(PathBuf),
    /// Already-encoded data URL (e.g. pre-compressed by the UI layer).
    DataUrl(String),
}

/// Outcome of attempting to attach an image to a new record.
#[derive(Debug, Clone, Default)]
pub struct AttachedImage {
    pub url: Option<String>,
    pub file_name: Option<String>,
    pub upload_error: Option<String>,
}

impl AttachedImage {
    /// Attach an optional image, downgrading any failure to a recorded
    /// reason so the caller's create still succeeds.
    pub async fn attach(source: Option<ImageSource>) -> Self {
        match source {
            None => Self::default(),
            Some(ImageSource::DataUrl(url)) => {
                tracing::debug!("Using pre-encoded image, size: {} bytes", url.len());
                Self {
                    url: Some(url),
                    file_name: None,
                    upload_error: None,
                }
            }
            Some(ImageSource::File(path)) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());

                match encode_file(&path).await {
                    Ok(url) => {
                        tracing::debug!("Image encoded successfully, size: {} bytes", url.len());
                        Self {
                            url: Some(url),
                            file_name,
                            upload_error: None,
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Image attach failed, continuing without image: {}", e);
                        Self {
                            url: None,
                            file_name,
                            upload_error: Some(e.to_string()),
                        }
                    }
                }
            }
        }
    }
}

/// Read an image file and encode it as a base64 data URL.
pub async fn encode_file(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).await?;
    if metadata.len() > MAX_IMAGE_BYTES {
        return Err(AppError::ImageTooLarge(metadata.len(), MAX_IMAGE_BYTES));
    }

    let data = fs::read(path).await?;
    let mime = mime_for_extension(path);

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&data)))
}

/// Mime type from the file extension. Unknown extensions fall back to a
/// generic binary type; the UI renders from the data URL either way.
fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
