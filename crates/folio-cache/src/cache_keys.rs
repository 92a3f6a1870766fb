//! Cache key generators for consistent key naming.
//!
//! Layout: `<prefix>:<class>:<id>` for single entities,
//! `<prefix>:<class>-list:<owner>` for collections and
//! `<prefix>:revoked:<id>` for revocation records.

use folio_config::CacheConfig;

/// Entity class names used in keys.
pub mod classes {
    pub const PHOTO: &str = "photo";
    pub const ARTICLE: &str = "article";
    pub const REVISION: &str = "revision";
}

const DEFAULT_PREFIX: &str = "folio";

/// Namespaced key builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.key_prefix.clone())
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key of a single entity.
    #[must_use]
    pub fn entity(&self, class: &str, id: &str) -> String {
        format!("{}:{}:{}", self.prefix, class, id)
    }

    /// Key of a collection view owned by `owner`.
    #[must_use]
    pub fn list(&self, class: &str, owner: &str) -> String {
        format!("{}:{}-list:{}", self.prefix, class, owner)
    }

    /// Key of a revocation record.
    #[must_use]
    pub fn revoked(&self, id: &str) -> String {
        format!("{}:revoked:{}", self.prefix, id)
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key() {
        let keys = KeySpace::default();
        assert_eq!(keys.entity(classes::PHOTO, "p1"), "folio:photo:p1");
    }

    #[test]
    fn test_list_key_does_not_collide_with_entity_key() {
        let keys = KeySpace::default();
        let list = keys.list(classes::PHOTO, "p1");
        assert_eq!(list, "folio:photo-list:p1");
        assert_ne!(list, keys.entity(classes::PHOTO, "p1"));
    }

    #[test]
    fn test_revoked_key_uses_configured_prefix() {
        let config = CacheConfig {
            key_prefix: "staging".to_string(),
            ..CacheConfig::default()
        };
        let keys = KeySpace::from_config(&config);
        assert_eq!(keys.revoked("jti-1"), "staging:revoked:jti-1");
    }
}
