use async_trait::async_trait;
use auth::Token;

use crate::identity::errors::IdentityError;
use crate::identity::errors::StorageError;
use crate::identity::models::Credential;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Role;
use crate::identity::models::StoredCredential;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Check a credential and issue a bearer token.
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown email or wrong password (indistinguishable)
    /// * `UnexpectedStorage` - Store lookup failed
    async fn login(&self, credential: Credential) -> Result<Token, IdentityError>;

    /// Resolve a bearer token to the identity it was issued for.
    ///
    /// # Errors
    /// * `Credential` - Token malformed, mis-signed or expired
    /// * `NotFound` - Token subject no longer exists
    /// * `UnexpectedStorage` - Store lookup failed
    async fn authenticate(&self, token: &str) -> Result<Identity, IdentityError>;

    /// Pass `identity` through if it holds `required`.
    ///
    /// # Errors
    /// * `NotAuthorized` - Identity has a different role
    fn authorize(&self, identity: Identity, required: Role) -> Result<Identity, IdentityError>;

    /// Register a new identity.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `UnexpectedStorage` - Store write failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError>;

    /// Delete the caller's own identity.
    ///
    /// # Errors
    /// * `UnexpectedStorage` - Identity already gone, or store write failed
    async fn delete_self(&self, identity: &Identity) -> Result<(), IdentityError>;

    /// List every identity. Admin only.
    ///
    /// # Errors
    /// * `NotAuthorized` - Requesting identity is not an admin
    /// * `UnexpectedStorage` - Store read failed
    async fn list_all(&self, requesting: &Identity) -> Result<Vec<Identity>, IdentityError>;
}

/// Persistence operations for identities.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Retrieve identity by identifier.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, StorageError>;

    /// Retrieve identity and password hash by email address.
    ///
    /// # Returns
    /// Optional stored credential (None if not found)
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, StorageError>;

    /// Persist a new identity.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Database` - Storage operation failed
    async fn insert(&self, credential: StoredCredential) -> Result<StoredCredential, StorageError>;

    /// Remove identity from storage.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `Database` - Storage operation failed
    async fn delete(&self, id: &IdentityId) -> Result<(), StorageError>;

    /// Retrieve all identities, in store order.
    async fn list_all(&self) -> Result<Vec<Identity>, StorageError>;
}
