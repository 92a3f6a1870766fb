//! Validation utilities.

use crate::FolioError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `FolioError` on failure.
    fn validate_request(&self) -> Result<(), FolioError> {
        self.validate().map_err(validation_errors_to_folio_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `FolioError`.
#[must_use]
pub fn validation_errors_to_folio_error(errors: ValidationErrors) -> FolioError {
    let mut field_errors: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string());
                ((*field).to_string(), message)
            })
        })
        .collect();
    field_errors.sort();

    let message = field_errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ");

    FolioError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates an article title.
    ///
    /// Titles double as cache keys and URL path segments.
    pub fn valid_title(title: &str) -> Result<(), ValidationError> {
        not_blank(title)?;
        if title.len() > 255 {
            return Err(ValidationError::new("title_too_long"));
        }
        if title.chars().any(|c| c == '/' || c.is_control()) {
            return Err(ValidationError::new("title_invalid_characters"));
        }
        Ok(())
    }

    /// Validates an uploaded file name.
    pub fn valid_file_name(name: &str) -> Result<(), ValidationError> {
        not_blank(name)?;
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(ValidationError::new("file_name_path_traversal"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[derive(Validate)]
    struct TitleForm {
        #[validate(custom(function = "valid_title"))]
        title: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_valid_title() {
        assert!(valid_title("Rust (programming language)").is_ok());
        assert!(valid_title("").is_err());
        assert!(valid_title("a/b").is_err());
        assert!(valid_title(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_valid_file_name() {
        assert!(valid_file_name("IMG_0001.jpg").is_ok());
        assert!(valid_file_name("../etc/passwd").is_err());
        assert!(valid_file_name("dir\\file.png").is_err());
    }

    #[test]
    fn test_validate_request_maps_to_validation_error() {
        let err = TitleForm { title: "a/b".to_string() }.validate_request().unwrap_err();
        assert!(matches!(err, FolioError::Validation(ref m) if m.contains("title")));
    }
}
