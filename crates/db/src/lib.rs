//! Storage layer for Bazaar.
//!
//! This crate provides:
//! - An in-memory document store with unique indexes
//! - Repository abstractions per collection
//! - Demo data seeding

pub mod repositories;
pub mod seed;
pub mod store;

pub use repositories::{
    BookingRepository, ListingRepository, ProviderRepository, UserRepository,
};
pub use store::MarketplaceStore;

use bazaar_shared::{AppError, AppResult};
use uuid::Uuid;

/// Parses a path or payload identifier.
///
/// # Errors
///
/// Returns `AppError::ResourceNotFound` when `raw` is not a valid id.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::ResourceNotFound(raw.to_string()))
}
