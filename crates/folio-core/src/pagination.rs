//! Offset pagination for list operations.

use serde::{Deserialize, Serialize};

/// A request for a slice of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of items to skip.
    pub offset: usize,
    /// Maximum number of items to return.
    pub limit: usize,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_LIMIT: usize = 20;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: usize = 100;

    /// Creates a page request, clamping `limit` to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// The first page with the default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }

    /// The page right after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self::new(self.offset + self.limit, self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// A slice of results plus the total count across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub offset: usize,
    pub limit: usize,
    pub total_elements: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            offset: request.offset,
            limit: request.limit,
            total_elements,
        }
    }

    /// Whether items exist past this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        ((self.offset + self.content.len()) as u64) < self.total_elements
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
