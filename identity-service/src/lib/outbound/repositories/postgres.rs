use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::identity::errors::StorageError;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::StoredCredential;
use crate::identity::ports::IdentityRepository;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

fn identity_from_row(row: &PgRow) -> Result<Identity, StorageError> {
    let id: Uuid = row.try_get("id").map_err(database_error)?;
    let name: String = row.try_get("name").map_err(database_error)?;
    let email: String = row.try_get("email").map_err(database_error)?;
    let role: String = row.try_get("role").map_err(database_error)?;

    Ok(Identity {
        id: IdentityId::from(id),
        name,
        email: EmailAddress::new(email)
            .map_err(|e| StorageError::Corrupt(format!("identity {}: {}", id, e)))?,
        role: role
            .parse()
            .map_err(|e| StorageError::Corrupt(format!("identity {}: {}", id, e)))?,
    })
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(identity_from_row).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, role, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        match row {
            Some(r) => Ok(Some(StoredCredential {
                identity: identity_from_row(&r)?,
                password_hash: r.try_get("password").map_err(database_error)?,
            })),
            None => Ok(None),
        }
    }

    async fn insert(&self, credential: StoredCredential) -> Result<StoredCredential, StorageError> {
        let identity = &credential.identity;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password, role)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(identity.id.0)
        .bind(&identity.name)
        .bind(identity.email.as_str())
        .bind(&credential.password_hash)
        .bind(identity.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StorageError::Conflict(
                        db_err.constraint().unwrap_or("users").to_string(),
                    );
                }
            }
            database_error(e)
        })?;

        Ok(credential)
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), StorageError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Identity>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, role
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(identity_from_row).collect()
    }
}
