//! Wiki article DTOs.

use folio_core::rules::valid_title;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Article edit request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    #[validate(custom(function = "valid_title", message = "Invalid article title"))]
    pub title: String,

    #[validate(length(max = 1_000_000, message = "Content is too large"))]
    pub content: String,

    /// Editor's change summary.
    #[serde(default)]
    #[validate(length(max = 500, message = "Comment must be at most 500 characters"))]
    pub comment: String,
}

impl UpdateArticleRequest {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            comment: comment.into(),
        }
    }
}
