use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Token;

use crate::identity::errors::IdentityError;
use crate::identity::errors::StorageError;
use crate::identity::models::Credential;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Role;
use crate::identity::models::StoredCredential;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::IdentityServicePort;

/// Domain service implementation for identity operations.
///
/// Stateless between calls: every request re-derives the caller's identity
/// from its token and a fresh store lookup.
pub struct IdentityService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
    default_role: Role,
}

impl<IR> IdentityService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Password hashing and token handling
    /// * `default_role` - Role assigned when a registration does not request one
    pub fn new(repository: Arc<IR>, authenticator: Arc<Authenticator>, default_role: Role) -> Self {
        Self {
            repository,
            authenticator,
            default_role,
        }
    }

    /// Run CPU-bound password work on the blocking pool.
    async fn run_blocking<T, F>(&self, work: F) -> Result<T, IdentityError>
    where
        T: Send + 'static,
        F: FnOnce(&Authenticator) -> T + Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || work(&authenticator))
            .await
            .map_err(|e| IdentityError::Internal(format!("Password worker failed: {}", e)))
    }
}

#[async_trait]
impl<IR> IdentityServicePort for IdentityService<IR>
where
    IR: IdentityRepository,
{
    async fn login(&self, credential: Credential) -> Result<Token, IdentityError> {
        let Some(stored) = self.repository.find_by_email(&credential.email).await? else {
            let password = credential.password;
            self.run_blocking(move |authenticator| authenticator.reject_unknown(&password))
                .await?;

            tracing::warn!(email = %credential.email, "Login failed: unknown email");
            return Err(IdentityError::AuthenticationFailed);
        };

        let subject = stored.identity.id;
        let password = credential.password;
        let password_hash = stored.password_hash;

        let result = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(&password, &password_hash, subject.0)
            })
            .await?;

        match result {
            Ok(token) => {
                tracing::info!(identity_id = %subject, "Login succeeded");
                Ok(token)
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(identity_id = %subject, "Login failed: wrong password");
                Err(IdentityError::AuthenticationFailed)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(identity_id = %subject, error = %e, "Login failed: unusable stored hash");
                Err(IdentityError::AuthenticationFailed)
            }
            Err(AuthenticationError::TokenError(e)) => Err(IdentityError::from(e)),
        }
    }

    async fn authenticate(&self, token: &str) -> Result<Identity, IdentityError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            IdentityError::Credential
        })?;

        let id = IdentityId::from(claims.subject);

        self.repository
            .find_by_id(&id)
            .await?
            .ok_or(IdentityError::NotFound(id))
    }

    fn authorize(&self, identity: Identity, required: Role) -> Result<Identity, IdentityError> {
        if identity.role == required {
            Ok(identity)
        } else {
            tracing::warn!(
                identity_id = %identity.id,
                role = %identity.role,
                required = %required,
                "Authorization rejected"
            );
            Err(IdentityError::NotAuthorized)
        }
    }

    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(IdentityError::AlreadyExists(command.email.to_string()));
        }

        let password = command.password;
        let password_hash = self
            .run_blocking(move |authenticator| authenticator.hash_password(&password))
            .await??;

        let email = command.email.to_string();
        let stored = StoredCredential {
            identity: Identity {
                id: IdentityId::new(),
                name: command.name,
                email: command.email,
                role: command.role.unwrap_or(self.default_role),
            },
            password_hash,
        };

        match self.repository.insert(stored).await {
            Ok(created) => {
                tracing::info!(
                    identity_id = %created.identity.id,
                    role = %created.identity.role,
                    "Identity registered"
                );
                Ok(created.into_identity())
            }
            Err(StorageError::Conflict(_)) => Err(IdentityError::AlreadyExists(email)),
            Err(e) => Err(IdentityError::UnexpectedStorage(e)),
        }
    }

    async fn delete_self(&self, identity: &Identity) -> Result<(), IdentityError> {
        if self.repository.find_by_id(&identity.id).await?.is_none() {
            tracing::warn!(identity_id = %identity.id, "Identity already absent before delete");
        }

        self.repository.delete(&identity.id).await?;
        tracing::info!(identity_id = %identity.id, "Identity deleted");

        Ok(())
    }

    async fn list_all(&self, requesting: &Identity) -> Result<Vec<Identity>, IdentityError> {
        self.authorize(requesting.clone(), Role::Admin)?;

        Ok(self.repository.list_all().await?)
    }
}
