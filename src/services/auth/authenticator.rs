use std::sync::Arc;
use std::time::Duration;

use crate::api::v1::extractors::Principal;
use crate::config::AuthConfig;
use crate::repos::{UserStore, error::RepoError};
use crate::services::auth::token::{TokenError, TokenVerifier};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    InvalidToken(#[from] TokenError),
    #[error("user not found")]
    UserNotFound,
    #[error("user lookup failed: {0}")]
    LookupFailed(#[source] RepoError),
    #[error("user lookup timed out after {0:?}")]
    LookupTimedOut(Duration),
}

/// Resolves an access token to a [`Principal`].
///
/// Steps (first failure wins, nothing is retried):
/// 1. verify signature/expiry
/// 2. look the subject up in the user store, bounded by `lookup_timeout`
/// 3. build the principal from the record
pub struct Authenticator {
    verifier: TokenVerifier,
    users: Arc<dyn UserStore>,
    lookup_timeout: Duration,
    conceal_unknown_user: bool,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("verifier", &self.verifier)
            .field("users", &self.users.backend_name())
            .field("lookup_timeout", &self.lookup_timeout)
            .field("conceal_unknown_user", &self.conceal_unknown_user)
            .finish()
    }
}

impl Authenticator {
    pub fn new(config: &AuthConfig, users: Arc<dyn UserStore>) -> Self {
        Self {
            verifier: TokenVerifier::new(&config.jwt_secret, config.leeway_seconds),
            users,
            lookup_timeout: config.user_lookup_timeout,
            conceal_unknown_user: config.conceal_unknown_user,
        }
    }

    pub fn conceals_unknown_user(&self) -> bool {
        self.conceal_unknown_user
    }

    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.verifier.verify(token)?;

        let lookup = tokio::time::timeout(self.lookup_timeout, self.users.find_by_id(&claims.sub));
        let record = match lookup.await {
            Ok(Ok(Some(record))) => record,
            Ok(Ok(None)) => return Err(AuthError::UserNotFound),
            Ok(Err(err)) => return Err(AuthError::LookupFailed(err)),
            Err(_) => return Err(AuthError::LookupTimedOut(self.lookup_timeout)),
        };

        tracing::debug!(
            user_id = %record.id,
            role = %record.role,
            expires_at = ?claims.expires_at(),
            "access token accepted"
        );

        Ok(Principal {
            id: record.id,
            role: record.role,
            email: record.email,
            name: record.name,
        })
    }
}
