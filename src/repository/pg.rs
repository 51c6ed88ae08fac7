use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ContactRepository;
use crate::error::StorageError;
use crate::model::{Contact, NewContact};

const COLUMNS: &str = "id, name, email, phone, date_created, date_updated";

/// Contact repository over a Postgres pool. The schema assigns ids
/// (`gen_random_uuid()`) and timestamp defaults; the unique index on
/// email backs the duplicate checks.
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, StorageError> {
        sqlx::query_as::<_, Contact>(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>, StorageError> {
        sqlx::query_as::<_, Contact>(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)
    }

    async fn find_all(&self) -> Result<(Vec<Contact>, i64), StorageError> {
        let results = sqlx::query_as::<_, Contact>(&format!("SELECT {COLUMNS} FROM contacts"))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

        let total = results.len() as i64;
        Ok((results, total))
    }

    async fn insert(&self, contact: &NewContact) -> Result<Contact, StorageError> {
        sqlx::query_as::<_, Contact>(&format!(
            "INSERT INTO contacts (name, email, phone) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)
    }

    async fn update(
        &self,
        id: Uuid,
        contact: &NewContact,
    ) -> Result<Option<Contact>, StorageError> {
        sqlx::query_as::<_, Contact>(&format!(
            "UPDATE contacts SET name = $2, email = $3, phone = $4, date_updated = now() \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

        Ok(result.rows_affected())
    }
}
