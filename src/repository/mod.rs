//! Persistence port for contact records. Implementations own identifier
//! generation, timestamp assignment, and the unique index on email.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageError;
use crate::model::{Contact, NewContact};

mod memory;
mod pg;

pub use memory::MemoryContactRepository;
pub use pg::PgContactRepository;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Returns the contact with the given id, or None if absent.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, StorageError>;

    /// Exact-match lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>, StorageError>;

    /// All contacts in storage-default order, with their total count.
    async fn find_all(&self) -> Result<(Vec<Contact>, i64), StorageError>;

    /// Inserts a new record, assigning id and both timestamps. Rejects a
    /// duplicate email with [`StorageError::UniqueViolation`].
    async fn insert(&self, contact: &NewContact) -> Result<Contact, StorageError>;

    /// Overwrites the three data fields of the record with the given id and
    /// refreshes `date_updated`. Returns the stored row, or None if absent.
    async fn update(&self, id: Uuid, contact: &NewContact)
        -> Result<Option<Contact>, StorageError>;

    /// Deletes by id; returns the number of rows removed.
    async fn delete(&self, id: Uuid) -> Result<u64, StorageError>;
}
