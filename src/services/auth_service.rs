//! Domain service for accounts and bearer tokens.
//!
//! Handles registration, login (token issuance) and resolving a token back to
//! an active user.

use serde::Serialize;
use thiserror::Error;

use crate::constants::auth::MIN_PASSWORD_LEN;
use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// The authenticated caller, resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Checks field formats; uniqueness is checked against the store later.
    pub fn validate(&self) -> Result<(), AuthError> {
        let len = self.username.chars().count();
        if !(3..=50).contains(&len) {
            return Err(AuthError::Validation(
                "Username must be between 3 and 50 characters".to_string(),
            ));
        }

        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(AuthError::Validation(
                "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
            ));
        }

        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => {
                return Err(AuthError::Validation("Invalid email address".to_string()));
            }
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        Ok(())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an active account.
    ///
    /// # Errors
    ///
    /// - Returns [`AuthError::Validation`] on malformed input
    /// - Returns [`AuthError::Conflict`] if the username or email is taken
    async fn register(&self, registration: Registration) -> Result<CurrentUser, AuthError>;

    /// Verifies credentials and issues an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for unknown users, wrong
    /// passwords and inactive accounts alike.
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError>;

    /// Resolves a bearer token to an active user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] for bad or expired tokens and for
    /// users that no longer exist or were deactivated.
    async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError>;
}
