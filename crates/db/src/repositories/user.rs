//! User repository.

use std::sync::Arc;

use bazaar_core::marketplace::{NewUser, User, validation::validate_new_user};
use bazaar_shared::{AppError, AppResult, UserType};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use tracing::info;
use uuid::Uuid;

use super::newest_first;
use crate::parse_id;
use crate::store::{MarketplaceStore, email_key};

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    store: Arc<MarketplaceStore>,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(store: Arc<MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Lists users, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<User> {
        let users: Vec<User> = self
            .store
            .users
            .iter()
            .map(|e| e.value().clone())
            .collect();
        newest_first(users, |u| u.created_at)
    }

    /// Finds a user by ID.
    #[must_use]
    pub fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.store.users.get(&id).map(|u| u.clone())
    }

    /// Finds a user by raw ID.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`.
    pub fn get(&self, raw_id: &str) -> AppResult<User> {
        let id = parse_id(raw_id)?;
        self.find_by_id(id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Creates a new user now.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad fields and `Duplicate` for a taken email.
    pub fn create(&self, input: NewUser) -> AppResult<User> {
        self.create_at(input, Utc::now())
    }

    /// Creates a new user with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad fields and `Duplicate` for a taken email.
    pub fn create_at(&self, input: NewUser, created_at: DateTime<Utc>) -> AppResult<User> {
        validate_new_user(&input)?;

        let user = User {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            user_type: input.user_type.unwrap_or(UserType::User),
            created_at,
        };

        match self.store.user_emails.entry(email_key(&user.email)) {
            Entry::Occupied(_) => {
                return Err(AppError::Duplicate {
                    field: "email".to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.store.users.insert(user.id, user.clone());

        info!(user_id = %user.id, user_type = %user.user_type, "User created");
        Ok(user)
    }

    /// Deletes a user and frees its email.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`.
    pub fn delete(&self, raw_id: &str) -> AppResult<User> {
        let id = parse_id(raw_id)?;
        let (_, user) = self
            .store
            .users
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        self.store.user_emails.remove(&email_key(&user.email));

        info!(user_id = %user.id, "User deleted");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> UserRepository {
        UserRepository::new(Arc::new(MarketplaceStore::new()))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ravi".into(),
            email: email.into(),
            user_type: None,
        }
    }

    #[test]
    fn test_create_and_get() {
        let repo = repo();
        let user = repo.create(new_user("ravi@example.com")).unwrap();

        assert_eq!(user.user_type, UserType::User);
        assert_eq!(repo.get(&user.id.to_string()).unwrap(), user);
        assert_eq!(repo.list().len(), 1);
    }

    #[test]
    fn test_duplicate_email_rejected_case_insensitive() {
        let repo = repo();
        repo.create(new_user("ravi@example.com")).unwrap();

        let err = repo.create(new_user("RAVI@example.com")).unwrap_err();
        assert_eq!(err.code(), Some(11000));
        assert_eq!(err.normalize().message, vec!["Duplicate field value entered"]);
    }

    #[test]
    fn test_delete_frees_email() {
        let repo = repo();
        let user = repo.create(new_user("ravi@example.com")).unwrap();

        repo.delete(&user.id.to_string()).unwrap();
        assert!(repo.find_by_id(user.id).is_none());
        assert!(repo.create(new_user("ravi@example.com")).is_ok());
    }

    #[test]
    fn test_get_malformed_and_unknown_ids() {
        let repo = repo();

        let malformed = repo.get("123").unwrap_err();
        assert_eq!(malformed.normalize().status_code, 404);
        assert_eq!(malformed.normalize().message, vec!["Resource not found"]);

        let unknown = repo.get(&Uuid::new_v4().to_string()).unwrap_err();
        assert_eq!(unknown.normalize().message, vec!["User not found"]);
    }

    #[test]
    fn test_invalid_user_not_stored() {
        let repo = repo();
        let err = repo.create(new_user("bad-email")).unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let repo = repo();
        let older = repo
            .create_at(new_user("a@example.com"), Utc::now() - chrono::Duration::days(2))
            .unwrap();
        let newer = repo.create(new_user("b@example.com")).unwrap();

        let ids: Vec<_> = repo.list().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
