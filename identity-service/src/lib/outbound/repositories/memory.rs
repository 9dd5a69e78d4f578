use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::errors::StorageError;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::StoredCredential;
use crate::identity::ports::IdentityRepository;

/// Process-local identity store.
///
/// Keeps insertion order and enforces email uniqueness like the `users`
/// table does. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    records: RwLock<Vec<StoredCredential>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, StorageError> {
        let records = self.records.read().await;

        Ok(records
            .iter()
            .find(|r| r.identity.id == *id)
            .map(|r| r.identity.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, StorageError> {
        let records = self.records.read().await;

        Ok(records.iter().find(|r| r.identity.email == *email).cloned())
    }

    async fn insert(&self, credential: StoredCredential) -> Result<StoredCredential, StorageError> {
        let mut records = self.records.write().await;

        if records
            .iter()
            .any(|r| r.identity.email == credential.identity.email)
        {
            return Err(StorageError::Conflict("users_email_key".to_string()));
        }
        if records.iter().any(|r| r.identity.id == credential.identity.id) {
            return Err(StorageError::Conflict("users_pkey".to_string()));
        }

        records.push(credential.clone());
        Ok(credential)
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), StorageError> {
        let mut records = self.records.write().await;

        let position = records
            .iter()
            .position(|r| r.identity.id == *id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        records.remove(position);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Identity>, StorageError> {
        let records = self.records.read().await;

        Ok(records.iter().map(|r| r.identity.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::models::Role;

    fn record(email: &str) -> StoredCredential {
        StoredCredential {
            identity: Identity {
                id: IdentityId::new(),
                name: "Foo".to_string(),
                email: EmailAddress::new(email.to_string()).unwrap(),
                role: Role::User,
            },
            password_hash: "$argon2id$v=19$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repository = InMemoryIdentityRepository::new();
        let created = repository.insert(record("a@example.com")).await.unwrap();

        let by_id = repository.find_by_id(&created.identity.id).await.unwrap();
        assert_eq!(by_id, Some(created.identity.clone()));

        let by_email = repository
            .find_by_email(&created.identity.email)
            .await
            .unwrap();
        assert_eq!(by_email, Some(created));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let repository = InMemoryIdentityRepository::new();
        repository.insert(record("a@example.com")).await.unwrap();

        let other_case = EmailAddress::new("A@example.com".to_string()).unwrap();
        assert_eq!(repository.find_by_email(&other_case).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_duplicate_email_conflicts() {
        let repository = InMemoryIdentityRepository::new();
        repository.insert(record("a@example.com")).await.unwrap();

        let result = repository.insert(record("a@example.com")).await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repository = InMemoryIdentityRepository::new();
        let created = repository.insert(record("a@example.com")).await.unwrap();

        repository.delete(&created.identity.id).await.unwrap();
        let result = repository.delete(&created.identity.id).await;

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_all_keeps_insertion_order() {
        let repository = InMemoryIdentityRepository::new();
        let first = repository.insert(record("a@example.com")).await.unwrap();
        let second = repository.insert(record("b@example.com")).await.unwrap();

        let listed = repository.list_all().await.unwrap();
        assert_eq!(listed, vec![first.identity, second.identity]);
    }
}
