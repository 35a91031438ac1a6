use axum::body::Bytes;
use axum::extract::multipart::Field;

use crate::core::error::{AppError, Result};
use crate::modules::storage::extension_for_content_type;
use crate::shared::constants::{ALLOWED_IMAGE_MIME_TYPES, MAX_IMAGE_SIZE};
use crate::shared::upload_gate;

/// Image file received in a multipart form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

impl UploadedImage {
    pub async fn from_field(field: Field<'_>) -> Result<Self> {
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let bytes = field.bytes().await.map_err(|e| {
            tracing::debug!("Failed to read image bytes: {}", e);
            AppError::BadRequest(format!("Failed to read image data: {}", e))
        })?;

        Ok(Self {
            bytes,
            content_type,
        })
    }

    /// Reject oversized files and content types outside the image allow-list
    pub fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(AppError::BadRequest("Image file is empty".to_string()));
        }

        if self.bytes.len() > MAX_IMAGE_SIZE {
            return Err(AppError::BadRequest(format!(
                "Image too large. Maximum size is {} MB",
                MAX_IMAGE_SIZE / 1024 / 1024
            )));
        }

        if !ALLOWED_IMAGE_MIME_TYPES.contains(&self.content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                self.content_type,
                ALLOWED_IMAGE_MIME_TYPES.join(", ")
            )));
        }

        Ok(())
    }

    pub fn is_animated(&self) -> bool {
        upload_gate::is_animated(&self.bytes)
    }

    /// Validation plus the animated-image gate, for uploads that get stored
    pub fn validate_for_storage(&self) -> Result<()> {
        self.validate()?;

        if self.is_animated() {
            tracing::info!(content_type = %self.content_type, "Rejected animated upload");
            return Err(AppError::animated_image());
        }

        Ok(())
    }

    pub fn extension(&self) -> &'static str {
        extension_for_content_type(&self.content_type).unwrap_or("bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(bytes: &'static [u8], content_type: &str) -> UploadedImage {
        UploadedImage {
            bytes: Bytes::from_static(bytes),
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn test_accepts_static_jpeg() {
        let upload = image(b"\xff\xd8\xff\xe0 jpeg body", "image/jpeg");
        assert!(upload.validate_for_storage().is_ok());
        assert_eq!(upload.extension(), "jpg");
    }

    #[test]
    fn test_rejects_disallowed_content_type() {
        let upload = image(b"%PDF-1.7", "application/pdf");
        assert!(matches!(upload.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_rejects_empty_file() {
        assert!(image(b"", "image/png").validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_file() {
        let upload = UploadedImage {
            bytes: Bytes::from(vec![0u8; MAX_IMAGE_SIZE + 1]),
            content_type: "image/png".to_string(),
        };
        assert!(upload.validate().is_err());
    }

    #[test]
    fn test_animated_gif_is_rejected_for_storage() {
        let upload = image(b"GIF89a\x01\x00\x01\x00", "image/gif");

        assert!(upload.validate().is_ok());
        assert!(matches!(
            upload.validate_for_storage(),
            Err(AppError::UploadRejected {
                reason: "animated_image",
                ..
            })
        ));
    }
}
