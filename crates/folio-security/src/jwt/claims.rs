//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,

    /// Issued at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Not before timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// JWT ID, the key under which the token is revoked.
    pub jti: String,
}

impl Claims {
    /// Creates new access token claims.
    #[must_use]
    pub fn new_access(
        user_id: impl Into<String>,
        issuer: String,
        audience: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            nbf: Some(now.timestamp()),
            iss: issuer,
            aud: audience,
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns the user ID.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Checks if the token is expired.
    ///
    /// `exp` itself is the last accepted second.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// How long the token keeps passing validation with `leeway_secs` of
    /// clock skew allowed, rounded up to whole seconds.
    ///
    /// `None` once the token is rejected.
    #[must_use]
    pub fn acceptance_window(&self, leeway_secs: u64) -> Option<Duration> {
        let last_accepted = self.exp.saturating_add_unsigned(leeway_secs);
        let left = last_accepted - Utc::now().timestamp();
        // Validation compares whole seconds, so second `last_accepted` is
        // accepted until it ends.
        u64::try_from(left).ok().map(|secs| Duration::from_secs(secs + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_expiring_in(secs: i64) -> Claims {
        Claims::new_access(
            "u1",
            "issuer".to_string(),
            "audience".to_string(),
            Utc::now() + chrono::Duration::seconds(secs),
        )
    }

    #[test]
    fn test_access_token_claims() {
        let claims = claims_expiring_in(3600);

        assert_eq!(claims.user_id(), "u1");
        assert!(!claims.is_expired());
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_each_token_gets_a_fresh_jti() {
        assert_ne!(claims_expiring_in(60).jti, claims_expiring_in(60).jti);
    }

    #[test]
    fn test_acceptance_window_covers_expiry_second() {
        let window = claims_expiring_in(600).acceptance_window(0).unwrap();
        assert!(window <= Duration::from_secs(601));
        assert!(window >= Duration::from_secs(600));
    }

    #[test]
    fn test_acceptance_window_includes_leeway() {
        let window = claims_expiring_in(600).acceptance_window(60).unwrap();
        assert!(window >= Duration::from_secs(660));
    }

    #[test]
    fn test_acceptance_window_after_expiry() {
        let claims = claims_expiring_in(-5);
        assert!(claims.is_expired());
        assert_eq!(claims.acceptance_window(0), None);
        assert!(claims.acceptance_window(60).is_some());
    }
}
