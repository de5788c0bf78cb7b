//! Provider repository.

use std::sync::Arc;

use bazaar_core::marketplace::{NewProvider, Provider, validation::validate_new_provider};
use bazaar_shared::{AppError, AppResult};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::newest_first;
use crate::parse_id;
use crate::store::MarketplaceStore;

/// Provider repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProviderRepository {
    store: Arc<MarketplaceStore>,
}

impl ProviderRepository {
    /// Creates a new provider repository.
    #[must_use]
    pub const fn new(store: Arc<MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Lists providers, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Provider> {
        let providers: Vec<Provider> = self
            .store
            .providers
            .iter()
            .map(|e| e.value().clone())
            .collect();
        newest_first(providers, |p| p.created_at)
    }

    /// Finds a provider by ID.
    #[must_use]
    pub fn find_by_id(&self, id: Uuid) -> Option<Provider> {
        self.store.providers.get(&id).map(|p| p.clone())
    }

    /// Finds a provider by raw ID.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`.
    pub fn get(&self, raw_id: &str) -> AppResult<Provider> {
        let id = parse_id(raw_id)?;
        self.find_by_id(id)
            .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))
    }

    /// Creates a provider now.
    ///
    /// # Errors
    ///
    /// Fails on invalid fields or when the owning user does not exist.
    pub fn create(&self, input: NewProvider) -> AppResult<Provider> {
        self.create_at(input, Utc::now())
    }

    /// Creates a provider with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Fails on invalid fields or when the owning user does not exist.
    pub fn create_at(&self, input: NewProvider, created_at: DateTime<Utc>) -> AppResult<Provider> {
        validate_new_provider(&input)?;

        let user_id = parse_id(&input.user_id)?;
        if !self.store.users.contains_key(&user_id) {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let provider = Provider {
            id: Uuid::new_v4(),
            user_id,
            business_name: input.business_name.trim().to_string(),
            created_at,
        };
        self.store.providers.insert(provider.id, provider.clone());

        info!(provider_id = %provider.id, %user_id, "Provider created");
        Ok(provider)
    }

    /// Deletes a provider.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`.
    pub fn delete(&self, raw_id: &str) -> AppResult<Provider> {
        let id = parse_id(raw_id)?;
        let (_, provider) = self
            .store
            .providers
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))?;

        info!(provider_id = %provider.id, "Provider deleted");
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserRepository;
    use bazaar_core::marketplace::NewUser;

    #[test]
    fn test_create_requires_existing_user() {
        let store = Arc::new(MarketplaceStore::new());
        let repo = ProviderRepository::new(store.clone());

        let err = repo
            .create(NewProvider {
                user_id: Uuid::new_v4().to_string(),
                business_name: "FixIt".into(),
            })
            .unwrap_err();
        assert_eq!(err.normalize().message, vec!["User not found"]);

        let user = UserRepository::new(store)
            .create(NewUser {
                name: "Meera".into(),
                email: "meera@example.com".into(),
                user_type: None,
            })
            .unwrap();
        let provider = repo
            .create(NewProvider {
                user_id: user.id.to_string(),
                business_name: "  FixIt  ".into(),
            })
            .unwrap();

        assert_eq!(provider.business_name, "FixIt");
        assert_eq!(repo.get(&provider.id.to_string()).unwrap(), provider);
    }

    #[test]
    fn test_malformed_user_reference() {
        let repo = ProviderRepository::new(Arc::new(MarketplaceStore::new()));
        let err = repo
            .create(NewProvider {
                user_id: "zzz".into(),
                business_name: "FixIt".into(),
            })
            .unwrap_err();

        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[test]
    fn test_delete_unknown() {
        let repo = ProviderRepository::new(Arc::new(MarketplaceStore::new()));
        let err = repo.delete(&Uuid::new_v4().to_string()).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
