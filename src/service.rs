//! Contact lifecycle rules: required-field validation, email uniqueness,
//! and partial-update merging. Storage is reached only through the
//! injected [`ContactRepository`].

use std::sync::Arc;

use uuid::Uuid;

use crate::error::ApiError;
use crate::model::{Contact, ContactList, CreateContactRequest, NewContact, UpdateContactRequest};
use crate::repository::ContactRepository;

pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    /// Validates the candidate, rejects a duplicate email, and persists.
    /// The pre-check and the insert are not atomic; a concurrent create
    /// that slips past the pre-check is caught by the unique index and
    /// surfaced as a conflict all the same.
    pub async fn create(&self, req: CreateContactRequest) -> Result<Contact, ApiError> {
        let candidate = validate_candidate(req)?;

        if self.repo.find_by_email(&candidate.email).await?.is_some() {
            return Err(ApiError::Conflict(
                "contact with this email already exists".to_string(),
            ));
        }

        let contact = self.repo.insert(&candidate).await?;
        Ok(contact)
    }

    pub async fn list(&self) -> Result<ContactList, ApiError> {
        let (results, total) = self.repo.find_all().await?;
        Ok(ContactList { results, total })
    }

    pub async fn get(&self, id: Uuid) -> Result<Contact, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("contact not found".to_string()))
    }

    /// Field-by-field merge: a present, non-empty input value replaces the
    /// stored one, anything else keeps it. Email uniqueness is not
    /// re-checked here; the unique index rejects a duplicate and the
    /// rejection surfaces as a conflict.
    pub async fn update(&self, id: Uuid, req: UpdateContactRequest) -> Result<Contact, ApiError> {
        let current = self.get(id).await?;

        if is_blank(&req.name) && is_blank(&req.email) && is_blank(&req.phone) {
            return Err(ApiError::Validation(
                "no data provided to update".to_string(),
            ));
        }

        let merged = NewContact {
            name: merge(req.name, current.name),
            email: merge(req.email, current.email),
            phone: merge(req.phone, current.phone),
        };

        self.repo
            .update(id, &merged)
            .await?
            .ok_or_else(|| ApiError::NotFound("contact not found".to_string()))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        let removed = self.repo.delete(id).await?;
        if removed == 0 {
            return Err(ApiError::NotFound("contact not found".to_string()));
        }
        Ok(())
    }
}

fn validate_candidate(req: CreateContactRequest) -> Result<NewContact, ApiError> {
    match (req.name, req.email, req.phone) {
        (Some(name), Some(email), Some(phone))
            if !name.is_empty() && !email.is_empty() && !phone.is_empty() =>
        {
            Ok(NewContact { name, email, phone })
        }
        _ => Err(ApiError::Validation(
            "name, email, and phone are required".to_string(),
        )),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn merge(input: Option<String>, current: String) -> String {
    match input {
        Some(value) if !value.is_empty() => value,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::repository::MemoryContactRepository;

    fn service() -> ContactService {
        ContactService::new(Arc::new(MemoryContactRepository::new()))
    }

    fn request(name: &str, email: &str, phone: &str) -> CreateContactRequest {
        CreateContactRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
        }
    }

    #[tokio::test]
    async fn create_returns_stored_contact() {
        let service = service();

        let contact = service
            .create(request("Alice", "alice@example.com", "08031234567"))
            .await
            .unwrap();

        assert!(!contact.id.is_nil());
        assert_eq!(contact.name, "Alice");
        assert_eq!(contact.email, "alice@example.com");
        assert_eq!(contact.phone, "08031234567");
        assert_eq!(contact.date_created, contact.date_updated);
    }

    #[tokio::test]
    async fn create_requires_all_fields() {
        let service = service();

        let missing = CreateContactRequest {
            name: Some("Alice".to_string()),
            email: None,
            phone: Some("08031234567".to_string()),
        };
        assert!(matches!(
            service.create(missing).await,
            Err(ApiError::Validation(_))
        ));

        let empty = request("Alice", "", "08031234567");
        assert!(matches!(
            service.create(empty).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let service = service();

        service
            .create(request("Alice", "a@x.com", "1"))
            .await
            .unwrap();
        let second = service.create(request("Bob", "a@x.com", "2")).await;

        assert!(matches!(second, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let service = service();

        let result = service.get(Uuid::new_v4()).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_merges_partial_input() {
        let service = service();
        let created = service
            .create(request("A", "a@x.com", "1"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(2)).await;
        let updated = service
            .update(
                created.id,
                UpdateContactRequest {
                    name: Some("B".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "B");
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.phone, "1");
        assert_eq!(updated.date_created, created.date_created);
        assert!(updated.date_updated > created.date_updated);
    }

    #[tokio::test]
    async fn update_with_nothing_to_change_is_rejected() {
        let service = service();
        let created = service
            .create(request("A", "a@x.com", "1"))
            .await
            .unwrap();

        let absent = service
            .update(created.id, UpdateContactRequest::default())
            .await;
        assert!(matches!(absent, Err(ApiError::Validation(_))));

        let empty = service
            .update(
                created.id,
                UpdateContactRequest {
                    name: Some(String::new()),
                    email: Some(String::new()),
                    phone: Some(String::new()),
                },
            )
            .await;
        assert!(matches!(empty, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let service = service();

        let result = service
            .update(
                Uuid::new_v4(),
                UpdateContactRequest {
                    name: Some("B".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_to_duplicate_email_is_a_conflict() {
        let service = service();
        service
            .create(request("A", "a@x.com", "1"))
            .await
            .unwrap();
        let other = service
            .create(request("B", "b@x.com", "2"))
            .await
            .unwrap();

        let result = service
            .update(
                other.id,
                UpdateContactRequest {
                    email: Some("a@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = service();
        let created = service
            .create(request("A", "a@x.com", "1"))
            .await
            .unwrap();

        service.remove(created.id).await.unwrap();

        assert!(matches!(
            service.get(created.id).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            service.remove(created.id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_counts_survivors() {
        let service = service();
        let mut ids = Vec::new();
        for i in 0..4 {
            let contact = service
                .create(request("C", &format!("c{i}@x.com"), "1"))
                .await
                .unwrap();
            ids.push(contact.id);
        }
        service.remove(ids[0]).await.unwrap();
        service.remove(ids[2]).await.unwrap();

        let list = service.list().await.unwrap();

        assert_eq!(list.total, 2);
        assert_eq!(list.results.len(), 2);
        assert!(list.results.iter().all(|c| c.id == ids[1] || c.id == ids[3]));
    }
}
