//! Listing repository.

use std::sync::Arc;

use bazaar_core::marketplace::{Listing, NewListing, validation::validate_new_listing};
use bazaar_shared::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::newest_first;
use crate::parse_id;
use crate::store::MarketplaceStore;

/// Listing repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    store: Arc<MarketplaceStore>,
}

impl ListingRepository {
    /// Creates a new listing repository.
    #[must_use]
    pub const fn new(store: Arc<MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Lists listings, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Listing> {
        let listings: Vec<Listing> = self
            .store
            .listings
            .iter()
            .map(|e| e.value().clone())
            .collect();
        newest_first(listings, |l| l.created_at)
    }

    /// Finds a listing by ID.
    #[must_use]
    pub fn find_by_id(&self, id: Uuid) -> Option<Listing> {
        self.store.listings.get(&id).map(|l| l.clone())
    }

    /// Finds a listing by raw ID.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`.
    pub fn get(&self, raw_id: &str) -> AppResult<Listing> {
        let id = parse_id(raw_id)?;
        self.find_by_id(id)
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))
    }

    /// Creates a listing now.
    ///
    /// # Errors
    ///
    /// Fails on invalid fields or when the provider does not exist.
    pub fn create(&self, input: NewListing) -> AppResult<Listing> {
        self.create_at(input, Utc::now())
    }

    /// Creates a listing with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Fails on invalid fields or when the provider does not exist.
    pub fn create_at(&self, input: NewListing, created_at: DateTime<Utc>) -> AppResult<Listing> {
        validate_new_listing(&input)?;

        let provider_id = parse_id(&input.provider_id)?;
        if !self.store.providers.contains_key(&provider_id) {
            return Err(AppError::NotFound("Provider not found".to_string()));
        }

        let listing = Listing {
            id: Uuid::new_v4(),
            provider_id,
            title: input.title.trim().to_string(),
            price: input.price.unwrap_or(Decimal::ZERO),
            active: input.active.unwrap_or(true),
            created_at,
        };
        self.store.listings.insert(listing.id, listing.clone());

        info!(listing_id = %listing.id, %provider_id, "Listing created");
        Ok(listing)
    }

    /// Deletes a listing.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`.
    pub fn delete(&self, raw_id: &str) -> AppResult<Listing> {
        let id = parse_id(raw_id)?;
        let (_, listing) = self
            .store
            .listings
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        info!(listing_id = %listing.id, "Listing deleted");
        Ok(listing)
    }
}
