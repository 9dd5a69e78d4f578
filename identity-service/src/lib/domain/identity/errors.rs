use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

use crate::identity::models::IdentityId;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0} (expected admin, user or guest)")]
    Unknown(String),
}

/// Failure reported by the identity store.
///
/// Native storage errors are mapped into this type once, inside the
/// repository adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Top-level error for all identity operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// Login failed; does not say whether the email or the password was wrong.
    #[error("Incorrect email or password")]
    AuthenticationFailed,

    /// Token missing, malformed, mis-signed or expired.
    #[error("Could not validate credentials")]
    Credential,

    #[error("Identity not found: {0}")]
    NotFound(IdentityId),

    #[error("Not authorized to perform this operation")]
    NotAuthorized,

    #[error("A user with email {0} already exists")]
    AlreadyExists(String),

    #[error("Unexpected storage error")]
    UnexpectedStorage(#[source] StorageError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(TokenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for IdentityError {
    fn from(err: StorageError) -> Self {
        IdentityError::UnexpectedStorage(err)
    }
}

impl From<TokenError> for IdentityError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => IdentityError::Credential,
            other => IdentityError::Token(other),
        }
    }
}
