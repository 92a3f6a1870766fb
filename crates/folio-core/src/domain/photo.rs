//! Photo entity.

use crate::PhotoId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A photo uploaded by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Unique identifier for the photo.
    pub photo_id: PhotoId,

    /// Owner of the photo.
    pub user_id: String,

    /// Original file name as uploaded.
    pub file_name: String,

    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,

    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,

    /// Technical metadata extracted at upload time.
    #[serde(default)]
    pub metadata: PhotoMetadata,
}

impl Photo {
    /// Creates a new photo record for a freshly uploaded file.
    #[must_use]
    pub fn new(user_id: impl Into<String>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            photo_id: PhotoId::new(),
            user_id: user_id.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            uploaded_at: Utc::now(),
            metadata: PhotoMetadata::default(),
        }
    }

    /// Attaches extracted metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: PhotoMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the blob name of the original file: `<user>/<photo><ext>`.
    #[must_use]
    pub fn blob_name(&self) -> String {
        let ext = std::path::Path::new(&self.file_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        format!("{}/{}{}", self.user_id, self.photo_id, ext)
    }
}

/// EXIF and technical data for a photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhotoMetadata {
    pub camera_make: String,
    pub camera_model: String,
    pub lens_model: String,
    /// e.g. `50mm`
    pub focal_length: String,
    /// e.g. `f/2.8`
    pub f_number: String,
    /// e.g. `1/125`
    pub exposure_time: String,
    pub iso: String,
    pub date_time_original: Option<DateTime<Utc>>,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_name_keeps_lowercase_extension() {
        let photo = Photo::new("u1", "Holiday.JPG", "image/jpeg");
        assert_eq!(photo.blob_name(), format!("u1/{}.jpg", photo.photo_id));
    }

    #[test]
    fn test_blob_name_without_extension() {
        let photo = Photo::new("u1", "README", "application/octet-stream");
        assert_eq!(photo.blob_name(), format!("u1/{}", photo.photo_id));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let photo = Photo::new("u1", "a.png", "image/png");
        let json = serde_json::to_value(&photo).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["mimeType"], "image/png");
        assert!(json["metadata"]["cameraModel"].is_string());
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let json = format!(
            r#"{{"photoId":"{}","userId":"u1","fileName":"a.png","mimeType":"image/png","uploadedAt":"2024-01-01T00:00:00Z"}}"#,
            PhotoId::new()
        );
        let photo: Photo = serde_json::from_str(&json).unwrap();
        assert_eq!(photo.metadata, PhotoMetadata::default());
    }
}
