//! Photo upload DTOs.

use folio_core::rules::{not_blank, valid_file_name};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Photo upload request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadPhotoRequest {
    #[validate(
        length(max = 255, message = "User ID must be at most 255 characters"),
        custom(function = "not_blank", message = "User ID is required")
    )]
    pub user_id: String,

    #[validate(
        length(min = 1, max = 255, message = "File name must be 1-255 characters"),
        custom(function = "valid_file_name", message = "Invalid file name")
    )]
    pub file_name: String,

    /// Raw file content.
    #[serde(skip)]
    #[validate(length(min = 1, message = "File is empty"))]
    pub data: Vec<u8>,
}

impl UploadPhotoRequest {
    #[must_use]
    pub fn new(user_id: impl Into<String>, file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            user_id: user_id.into(),
            file_name: file_name.into(),
            data,
        }
    }
}
