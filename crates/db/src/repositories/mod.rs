//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface over the shared store, hiding
//! index maintenance and id parsing from the rest of the application.

pub mod booking;
pub mod listing;
pub mod provider;
pub mod user;

pub use booking::BookingRepository;
pub use listing::ListingRepository;
pub use provider::ProviderRepository;
pub use user::UserRepository;

use chrono::{DateTime, Utc};

/// Sorts records newest first.
pub(crate) fn newest_first<T>(
    mut items: Vec<T>,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}
