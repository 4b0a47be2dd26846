//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::constants::auth::TOKEN_TYPE;
use crate::db::repositories::user::{hash_password, verify_password};
use crate::db::{NewUser, Store};
use crate::services::auth_service::{
    AccessToken, AuthError, AuthService, CurrentUser, Registration,
};
use crate::services::jwt::TokenKeys;
use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use tokio::task;
use tracing::{debug, info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    keys: TokenKeys,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, keys: TokenKeys, security: SecurityConfig) -> Self {
        Self {
            store,
            keys,
            security,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, registration: Registration) -> Result<CurrentUser, AuthError> {
        register_user(&self.store, &self.security, registration).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let password = password.to_string();

        let Some((user, password_hash)) = self.store.get_password_hash(username).await? else {
            debug!(username, "Login for unknown user");
            // Same Argon2 cost as a real verification so timing does not reveal the miss.
            let security = self.security.clone();
            task::spawn_blocking(move || hash_password(&password, &security))
                .await
                .context("Password hashing task panicked")??;
            return Err(AuthError::InvalidCredentials);
        };

        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")??;

        if !is_valid {
            warn!(username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(username, "Login attempt for inactive user");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self
            .keys
            .issue(&user.username)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))?;

        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE,
            expires_in: self.keys.lifetime_secs(),
        })
    }

    async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self.keys.verify(token).map_err(|e| {
            debug!("Rejected bearer token: {e}");
            AuthError::Unauthorized
        })?;

        match self.store.get_user_by_username(&claims.sub).await? {
            Some(user) if user.is_active => Ok(CurrentUser::from(user)),
            _ => Err(AuthError::Unauthorized),
        }
    }
}

/// Validates, hashes and stores a new account.
///
/// Shared by the HTTP registration endpoint and `flixdex user add`, which has
/// no token keys to build a full service with.
pub async fn register_user(
    store: &Store,
    security: &SecurityConfig,
    registration: Registration,
) -> Result<CurrentUser, AuthError> {
    registration.validate()?;

    let username = registration.username;
    let email = registration.email.trim().to_string();

    if store.username_or_email_taken(&username, &email).await? {
        return Err(AuthError::Conflict(
            "Username or email already registered".to_string(),
        ));
    }

    // Argon2 is CPU-intensive and would block the async runtime if run directly.
    let password = registration.password;
    let security = security.clone();
    let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
        .await
        .context("Password hashing task panicked")??;

    let user = store
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| {
            // A concurrent registration can still win the race past the check above.
            if let Some(db_err) = e.downcast_ref::<DbErr>()
                && matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            {
                AuthError::Conflict("Username or email already registered".to_string())
            } else {
                AuthError::from(e)
            }
        })?;

    info!(username = %user.username, "User registered");
    Ok(CurrentUser::from(user))
}
