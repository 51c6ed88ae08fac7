use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::ContactRepository;
use crate::error::StorageError;
use crate::model::{Contact, NewContact};

/// Vec-backed repository with the same observable behavior as the
/// Postgres one, including the unique-email rejection. Injected in place
/// of a database in tests.
#[derive(Default)]
pub struct MemoryContactRepository {
    contacts: Mutex<Vec<Contact>>,
}

impl MemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, StorageError> {
        let contacts = self.contacts.lock().expect("contact store poisoned");
        Ok(contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>, StorageError> {
        let contacts = self.contacts.lock().expect("contact store poisoned");
        Ok(contacts.iter().find(|c| c.email == email).cloned())
    }

    async fn find_all(&self) -> Result<(Vec<Contact>, i64), StorageError> {
        let contacts = self.contacts.lock().expect("contact store poisoned");
        let results = contacts.clone();
        let total = results.len() as i64;
        Ok((results, total))
    }

    async fn insert(&self, contact: &NewContact) -> Result<Contact, StorageError> {
        let mut contacts = self.contacts.lock().expect("contact store poisoned");
        if contacts.iter().any(|c| c.email == contact.email) {
            return Err(StorageError::UniqueViolation(contact.email.clone()));
        }

        let now = Utc::now();
        let stored = Contact {
            id: Uuid::new_v4(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            date_created: now,
            date_updated: now,
        };
        contacts.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: Uuid,
        contact: &NewContact,
    ) -> Result<Option<Contact>, StorageError> {
        let mut contacts = self.contacts.lock().expect("contact store poisoned");
        if contacts
            .iter()
            .any(|c| c.id != id && c.email == contact.email)
        {
            return Err(StorageError::UniqueViolation(contact.email.clone()));
        }

        let Some(stored) = contacts.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        stored.name = contact.name.clone();
        stored.email = contact.email.clone();
        stored.phone = contact.phone.clone();
        stored.date_updated = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StorageError> {
        let mut contacts = self.contacts.lock().expect("contact store poisoned");
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        Ok((before - contacts.len()) as u64)
    }
}
