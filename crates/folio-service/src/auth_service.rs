//! Authentication service implementation.

use crate::dto::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
use async_trait::async_trait;
use folio_core::{FolioError, FolioResult, Interface, User, ValidateExt};
use folio_repository::UserRepository;
use folio_security::{Claims, TokenProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Interface + Send + Sync {
    /// Registers a new user id. An id already taken is a `Conflict`.
    async fn register(&self, request: RegisterRequest) -> FolioResult<MessageResponse>;

    /// Issues an access token for a user.
    async fn login(&self, request: LoginRequest) -> FolioResult<AuthResponse>;

    /// Verifies an access token, revocations included.
    async fn authenticate(&self, token: &str) -> FolioResult<Claims>;

    /// Revokes an access token for the rest of its lifetime.
    async fn logout(&self, token: &str) -> FolioResult<MessageResponse>;
}

/// Authentication service implementation.
pub struct AuthServiceImpl {
    token_provider: Arc<TokenProvider>,
    users: Arc<dyn UserRepository>,
}

impl AuthServiceImpl {
    /// Creates a new authentication service.
    #[must_use]
    pub fn new(token_provider: Arc<TokenProvider>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            token_provider,
            users,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> FolioResult<MessageResponse> {
        debug!("Registering user: {}", request.user_id);

        request.validate_request()?;

        if self.users.find_by_user_id(&request.user_id).await?.is_some() {
            return Err(FolioError::Conflict(format!(
                "User {} already exists",
                request.user_id
            )));
        }
        self.users.create(&User::new(&request.user_id)).await?;

        info!("User registered: {}", request.user_id);
        Ok(MessageResponse::new("User registered"))
    }

    async fn login(&self, request: LoginRequest) -> FolioResult<AuthResponse> {
        debug!("Login attempt for user: {}", request.user_id);

        request.validate_request()?;

        let issued = self.token_provider.issue_access_token(&request.user_id)?;

        info!("Token issued for user: {}", request.user_id);
        Ok(AuthResponse {
            access_token: issued.access_token,
            token_type: issued.token_type,
            expires_in: issued.expires_at - chrono::Utc::now().timestamp(),
        })
    }

    async fn authenticate(&self, token: &str) -> FolioResult<Claims> {
        self.token_provider.verify(token).await
    }

    async fn logout(&self, token: &str) -> FolioResult<MessageResponse> {
        let claims = self.token_provider.verify(token).await?;
        self.token_provider.revoke(&claims).await?;

        info!("User logged out: {}", claims.sub);
        Ok(MessageResponse::new("Successfully logged out"))
    }
}

impl std::fmt::Debug for AuthServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl")
            .field("token_provider", &self.token_provider)
            .finish()
    }
}
