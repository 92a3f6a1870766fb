//! Cache settings shared by the service constructors.

use folio_cache::{KeySpace, TtlPolicy};
use folio_config::CacheConfig;

/// Key namespace and per-collection TTL policies.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub keys: KeySpace,
    /// Articles and revisions.
    pub entity_ttl: TtlPolicy,
    pub photo_ttl: TtlPolicy,
    /// Owner lists and revision histories.
    pub list_ttl: TtlPolicy,
}

impl CacheSettings {
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        let policy = |base| TtlPolicy::new(base).with_jitter_ratio(config.jitter_ratio);
        Self {
            keys: KeySpace::from_config(config),
            entity_ttl: policy(config.entity_ttl()),
            photo_ttl: policy(config.photo_ttl()),
            list_ttl: policy(config.list_ttl()),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_follow_cache_config() {
        let settings = CacheSettings::default();

        assert_eq!(settings.keys.prefix(), "folio");
        assert_eq!(settings.entity_ttl.base(), Duration::from_secs(3600));
        assert_eq!(settings.photo_ttl.base(), Duration::from_secs(1800));
        assert_eq!(settings.list_ttl.base(), Duration::from_secs(300));
        assert!((settings.list_ttl.jitter_ratio() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_config() {
        let config = CacheConfig {
            key_prefix: "staging".to_string(),
            list_ttl_secs: 60,
            jitter_ratio: 0.0,
            ..CacheConfig::default()
        };
        let settings = CacheSettings::from_config(&config);

        assert_eq!(settings.keys.list("photo", "u1"), "staging:photo-list:u1");
        assert_eq!(settings.list_ttl.max_ttl(), Duration::from_secs(60));
    }
}
