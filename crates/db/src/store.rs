//! In-memory marketplace store.
//!
//! Collections are sharded concurrent maps; the email index enforces
//! uniqueness the same way a unique database index would.

use bazaar_core::marketplace::{Booking, Listing, MarketplaceSnapshot, Provider, User};
use dashmap::DashMap;
use uuid::Uuid;

/// Shared backing store for every repository.
#[derive(Debug, Default)]
pub struct MarketplaceStore {
    pub(crate) users: DashMap<Uuid, User>,
    pub(crate) user_emails: DashMap<String, Uuid>,
    pub(crate) providers: DashMap<Uuid, Provider>,
    pub(crate) listings: DashMap<Uuid, Listing>,
    pub(crate) bookings: DashMap<Uuid, Booking>,
}

impl MarketplaceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all collections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.users.len() + self.providers.len() + self.listings.len() + self.bookings.len()
    }

    /// Copies every collection for stats computation.
    #[must_use]
    pub fn snapshot(&self) -> MarketplaceSnapshot {
        MarketplaceSnapshot {
            users: self.users.iter().map(|e| e.value().clone()).collect(),
            providers: self.providers.iter().map(|e| e.value().clone()).collect(),
            listings: self.listings.iter().map(|e| e.value().clone()).collect(),
            bookings: self.bookings.iter().map(|e| e.value().clone()).collect(),
        }
    }
}

/// Normalized key for the unique email index.
pub(crate) fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}
