//! JWT token provider for issuing, verifying and revoking access tokens.

use super::Claims;
use chrono::{Duration, Utc};
use folio_cache::RevocationLedger;
use folio_config::SecurityConfig;
use folio_core::{FolioError, FolioResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A freshly issued access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub access_token: String,
    /// JWT ID of the token.
    pub jti: String,
    /// Expiration timestamp.
    pub expires_at: i64,
    /// Token type (always "Bearer").
    pub token_type: String,
}

/// Clock skew tolerated on `exp` and `nbf`.
const LEEWAY_SECS: u64 = 0;

/// JWT token provider service.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
    ledger: Arc<dyn RevocationLedger>,
}

impl TokenProvider {
    /// Creates a new token provider that checks `ledger` on every verify.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>, ledger: Arc<dyn RevocationLedger>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = LEEWAY_SECS;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
            ledger,
        }
    }

    /// Issues an access token for a user.
    pub fn issue_access_token(&self, user_id: &str) -> FolioResult<IssuedToken> {
        let expires_at = Utc::now() + Duration::seconds(self.config.jwt_access_expiration_secs as i64);

        let claims = Claims::new_access(
            user_id,
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| FolioError::Internal(format!("Failed to generate access token: {}", e)))?;

        debug!("Generated access token for user {}", user_id);
        Ok(IssuedToken {
            access_token,
            jti: claims.jti,
            expires_at: claims.exp,
            token_type: "Bearer".to_string(),
        })
    }

    /// Validates signature, issuer, audience and expiry; returns the claims.
    ///
    /// Does not consult the revocation ledger; use [`Self::verify`] for that.
    pub fn validate_token(&self, token: &str) -> FolioResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Token validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => FolioError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidToken
                    | jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        FolioError::InvalidToken("Invalid token signature".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        FolioError::InvalidToken("Invalid token issuer".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        FolioError::InvalidToken("Invalid token audience".to_string())
                    }
                    _ => FolioError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Validates a token and rejects it if its `jti` has been revoked.
    pub async fn verify(&self, token: &str) -> FolioResult<Claims> {
        let claims = self.validate_token(token)?;

        if claims.jti.is_empty() {
            return Err(FolioError::InvalidToken("Token missing jti".to_string()));
        }

        if self.ledger.is_revoked(&claims.jti).await {
            debug!(jti = %claims.jti, "Rejected revoked token");
            return Err(FolioError::TokenRevoked);
        }

        Ok(claims)
    }

    /// Revokes a token's `jti` for as long as [`Self::validate_token`] would
    /// still accept it.
    ///
    /// Fails with `TokenExpired` when the token is already rejected.
    pub async fn revoke(&self, claims: &Claims) -> FolioResult<()> {
        let ttl = claims
            .acceptance_window(self.validation.leeway)
            .ok_or(FolioError::TokenExpired)?;

        self.ledger.revoke(&claims.jti, ttl).await;
        info!(jti = %claims.jti, ttl_secs = ttl.as_secs(), "Token revoked");
        Ok(())
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_cache::InMemoryRevocationLedger;

    fn test_config() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_access_expiration_secs: 3600,
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
        }
    }

    fn create_test_provider() -> (TokenProvider, Arc<InMemoryRevocationLedger>) {
        let ledger = Arc::new(InMemoryRevocationLedger::new());
        let provider = TokenProvider::new(Arc::new(test_config()), ledger.clone());
        (provider, ledger)
    }

    fn encode_claims(provider: &TokenProvider, claims: &Claims) -> String {
        encode(&Header::default(), claims, &provider.encoding_key).unwrap()
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let (provider, _) = create_test_provider();

        let issued = provider.issue_access_token("u1").unwrap();
        let claims = provider.verify(&issued.access_token).await.unwrap();

        assert_eq!(claims.user_id(), "u1");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(issued.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let (provider, ledger) = create_test_provider();
        let issued = provider.issue_access_token("u1").unwrap();
        let claims = provider.verify(&issued.access_token).await.unwrap();

        provider.revoke(&claims).await.unwrap();

        let err = provider.verify(&issued.access_token).await.unwrap_err();
        assert!(matches!(err, FolioError::TokenRevoked));
        assert!(ledger.is_revoked(&issued.jti).await);

        // Signature checks alone still pass.
        assert!(provider.validate_token(&issued.access_token).is_ok());
    }

    #[tokio::test]
    async fn test_revocation_is_per_token() {
        let (provider, _) = create_test_provider();
        let first = provider.issue_access_token("u1").unwrap();
        let second = provider.issue_access_token("u1").unwrap();

        let claims = provider.validate_token(&first.access_token).unwrap();
        provider.revoke(&claims).await.unwrap();

        assert!(provider.verify(&second.access_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_expired_claims_fails() {
        let (provider, ledger) = create_test_provider();
        let config = test_config();
        let claims = Claims::new_access(
            "u1",
            config.jwt_issuer,
            config.jwt_audience,
            Utc::now() - Duration::seconds(10),
        );

        let err = provider.revoke(&claims).await.unwrap_err();
        assert!(matches!(err, FolioError::TokenExpired));
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_revoked_token_stays_rejected_past_expiry() {
        let ledger = Arc::new(InMemoryRevocationLedger::new());
        let provider = TokenProvider::new(
            Arc::new(SecurityConfig {
                jwt_access_expiration_secs: 2,
                ..test_config()
            }),
            ledger,
        );
        let issued = provider.issue_access_token("u1").unwrap();
        let claims = provider.verify(&issued.access_token).await.unwrap();

        provider.revoke(&claims).await.unwrap();
        assert!(matches!(
            provider.verify(&issued.access_token).await,
            Err(FolioError::TokenRevoked)
        ));

        tokio::time::sleep(std::time::Duration::from_secs(3)).await;

        let after = provider.verify(&issued.access_token).await;
        assert!(after.is_err(), "revoked token accepted again: {:?}", after);
    }

    #[test]
    fn test_token_past_exp_is_rejected_without_grace() {
        let (provider, _) = create_test_provider();
        let config = test_config();
        let mut claims = Claims::new_access(
            "u1",
            config.jwt_issuer,
            config.jwt_audience,
            Utc::now() - Duration::seconds(2),
        );
        claims.iat -= 60;
        claims.nbf = Some(claims.iat);
        let token = encode_claims(&provider, &claims);

        let err = provider.validate_token(&token).unwrap_err();
        assert!(matches!(err, FolioError::TokenExpired));
    }

    #[test]
    fn test_expired_token() {
        let (provider, _) = create_test_provider();
        let config = test_config();
        let mut claims = Claims::new_access(
            "u1",
            config.jwt_issuer,
            config.jwt_audience,
            Utc::now() - Duration::hours(1),
        );
        claims.iat -= 7200;
        claims.nbf = Some(claims.iat);
        let token = encode_claims(&provider, &claims);

        let err = provider.validate_token(&token).unwrap_err();
        assert!(matches!(err, FolioError::TokenExpired));
    }

    #[test]
    fn test_wrong_audience() {
        let (provider, _) = create_test_provider();
        let claims = Claims::new_access(
            "u1",
            "test-issuer".to_string(),
            "someone-else".to_string(),
            Utc::now() + Duration::hours(1),
        );
        let token = encode_claims(&provider, &claims);

        let err = provider.validate_token(&token).unwrap_err();
        assert!(matches!(err, FolioError::InvalidToken(_)));
    }

    #[test]
    fn test_invalid_token() {
        let (provider, _) = create_test_provider();
        let result = provider.validate_token("invalid-token");
        assert!(matches!(result, Err(FolioError::InvalidToken(_))));
    }

    #[test]
    fn test_token_signed_with_other_secret() {
        let (provider, _) = create_test_provider();
        let other = TokenProvider::new(
            Arc::new(SecurityConfig {
                jwt_secret: "a-completely-different-secret-key".to_string(),
                ..test_config()
            }),
            Arc::new(InMemoryRevocationLedger::new()),
        );
        let issued = other.issue_access_token("u1").unwrap();

        assert!(provider.validate_token(&issued.access_token).is_err());
    }
}
