//! Registration, login and session tokens.

pub mod password;
pub mod policy;
pub mod token;

pub use self::policy::PolicyViolation;
pub use self::token::{TokenError, TokenSigner};

use crate::users::{StoreError, UserStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password error: {0}")]
    InvalidPassword(#[from] PolicyViolation),
    #[error("username already exists")]
    UsernameTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Hash(#[from] password::HashError),
    #[error("failed to sign session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

// A duplicate insert means another registration won the race after the
// pre-check, so it reads the same as an up-front duplicate.
impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => Self::UsernameTaken,
            err => Self::Store(err),
        }
    }
}

/// Registration and login on top of the user store.
#[derive(Clone)]
pub struct AuthService {
    store: UserStore,
    signer: Arc<TokenSigner>,
}

impl AuthService {
    #[must_use]
    pub fn new(store: UserStore, signer: Arc<TokenSigner>) -> Self {
        Self { store, signer }
    }

    /// Create a new account. No token is issued; the caller logs in
    /// separately.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPassword` when the password fails the composition
    /// rules, `UsernameTaken` when the username exists (the lookup is only
    /// the fast path, the insert constraint decides races), or a store/hash
    /// error
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        policy::validate(password)?;

        if self.store.get_user_by_username(username).await?.is_some() {
            debug!("Username already exists: {}", username);

            return Err(AuthError::UsernameTaken);
        }

        let password_hash = password::hash(password).await?;

        self.store.create_user(username, &password_hash).await?;

        Ok(())
    }

    /// Verify credentials and mint a session token for the user's id.
    ///
    /// An unknown username and a wrong password both yield
    /// `InvalidCredentials`, so responses carry no username-enumeration
    /// signal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` on a failed match, or a store/signing
    /// error
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let Some(user) = self.store.get_user_by_username(username).await? else {
            debug!("Unknown username: {}", username);

            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify(password, &user.password_hash).await {
            debug!("Password mismatch for user: {}", username);

            return Err(AuthError::InvalidCredentials);
        }

        let token = self.signer.issue(user.id)?;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
    use std::time::Duration;

    fn unreachable_service() -> AuthService {
        let options = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("invalid")
            .database("invalid")
            .ssl_mode(PgSslMode::Disable);
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy_with(options);

        AuthService::new(
            UserStore::new(pool),
            Arc::new(TokenSigner::new(b"test-secret", token::TOKEN_LIFETIME)),
        )
    }

    #[tokio::test]
    async fn register_rejects_weak_password_before_touching_the_store() {
        // the store is unreachable, so reaching it would fail differently
        let result = unreachable_service().register("alice", "short1!").await;

        assert!(matches!(
            result,
            Err(AuthError::InvalidPassword(PolicyViolation::Length))
        ));
    }

    #[tokio::test]
    async fn register_surfaces_store_failure() {
        let result = unreachable_service().register("alice", "Passw0rd!").await;

        assert!(matches!(result, Err(AuthError::Store(_))));
    }

    #[tokio::test]
    async fn login_surfaces_store_failure() {
        let result = unreachable_service().login("alice", "Passw0rd!").await;

        assert!(matches!(result, Err(AuthError::Store(_))));
    }

    #[test]
    fn duplicate_username_maps_to_username_taken() {
        let err = AuthError::from(StoreError::DuplicateUsername);

        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[test]
    fn policy_violation_message_names_the_rule() {
        let err = AuthError::InvalidPassword(PolicyViolation::Length);

        assert_eq!(
            err.to_string(),
            "password error: must be between 8 and 64 characters"
        );
    }
}
