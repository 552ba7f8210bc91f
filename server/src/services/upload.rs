//! Recipe image checks and content-addressed storage paths.
//!
//! Objects are stored under `{user_id}/{sha256}.{ext}`: the same user
//! uploading the same bytes twice lands on the same object, and one user
//! cannot overwrite another's images.

use std::fmt::Write;

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// An image file received in a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Image is required")]
    Empty,
    #[error("Image must be {max} bytes or smaller")]
    TooLarge { size: usize, max: usize },
    #[error("Unsupported image type {0}")]
    UnsupportedType(String),
}

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// File extension for an accepted image MIME type.
#[must_use]
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Guess a MIME type from a file name when the browser sent a generic one.
fn content_type_from_name(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

impl ImageUpload {
    /// Validate size and type. Returns the normalized content type and the
    /// extension to store under.
    ///
    /// # Errors
    ///
    /// Returns an error for empty, oversized, or non-image uploads.
    pub fn check(&self, max_bytes: usize) -> Result<(&'static str, &'static str), UploadError> {
        if self.bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if self.bytes.len() > max_bytes {
            return Err(UploadError::TooLarge { size: self.bytes.len(), max: max_bytes });
        }
        let declared = image_extension(&self.content_type).map(|ext| (canonical_type(ext), ext));
        let guessed = || {
            let content_type = self.file_name.as_deref().and_then(content_type_from_name)?;
            image_extension(content_type).map(|ext| (content_type, ext))
        };
        declared
            .or_else(guessed)
            .ok_or_else(|| UploadError::UnsupportedType(self.content_type.clone()))
    }
}

fn canonical_type(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Storage object path for an image owned by `user_id`.
#[must_use]
pub fn object_path(user_id: Uuid, bytes: &[u8], ext: &str) -> String {
    let digest = Sha256::digest(bytes);
    format!("{user_id}/{}.{ext}", bytes_to_hex(&digest))
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
