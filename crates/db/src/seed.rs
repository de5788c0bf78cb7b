//! Demo data for local development.

use std::sync::Arc;

use bazaar_core::marketplace::{BookingStatus, NewBooking, NewListing, NewProvider, NewUser};
use bazaar_shared::{AppResult, UserType};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::repositories::{
    BookingRepository, ListingRepository, ProviderRepository, UserRepository,
};
use crate::store::MarketplaceStore;

/// Email of the seeded administrator.
pub const DEMO_ADMIN_EMAIL: &str = "admin@bazaar.local";

const CUSTOMERS: [(&str, &str, i64); 5] = [
    ("Aarav Shah", "aarav@example.com", 50),
    ("Diya Menon", "diya@example.com", 35),
    ("Ishaan Rao", "ishaan@example.com", 20),
    ("Kavya Iyer", "kavya@example.com", 9),
    ("Neel Gupta", "neel@example.com", 2),
];

const PROVIDERS: [(&str, &str, &str); 2] = [
    ("Farah Khan", "farah@example.com", "Sparkle Home Cleaning"),
    ("Vikram Singh", "vikram@example.com", "QuickFix Plumbing"),
];

const BOOKINGS: [(usize, usize, BookingStatus, i64); 8] = [
    (0, 0, BookingStatus::Completed, 40),
    (1, 0, BookingStatus::Completed, 28),
    (2, 1, BookingStatus::Completed, 15),
    (0, 2, BookingStatus::Cancelled, 12),
    (3, 1, BookingStatus::Confirmed, 6),
    (4, 0, BookingStatus::Pending, 1),
    (2, 2, BookingStatus::Pending, 1),
    (1, 1, BookingStatus::Completed, 3),
];

/// Fills the store with an admin, customers, providers, listings and bookings.
///
/// Creation times are spread over the last two months relative to `now`.
///
/// # Errors
///
/// Fails if any record is rejected, e.g. when the store was already seeded.
pub fn seed_demo_data(store: &Arc<MarketplaceStore>, now: DateTime<Utc>) -> AppResult<()> {
    let users = UserRepository::new(store.clone());
    let providers = ProviderRepository::new(store.clone());
    let listings = ListingRepository::new(store.clone());
    let bookings = BookingRepository::new(store.clone());
    let days_ago = |days: i64| now - Duration::days(days);

    users.create_at(
        NewUser {
            name: "Bazaar Admin".into(),
            email: DEMO_ADMIN_EMAIL.into(),
            user_type: Some(UserType::Admin),
        },
        days_ago(90),
    )?;

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, email, age) in CUSTOMERS {
        let user = users.create_at(
            NewUser {
                name: name.into(),
                email: email.into(),
                user_type: Some(UserType::User),
            },
            days_ago(age),
        )?;
        customer_ids.push(user.id);
    }

    let mut provider_ids = Vec::with_capacity(PROVIDERS.len());
    for (name, email, business) in PROVIDERS {
        let owner = users.create_at(
            NewUser {
                name: name.into(),
                email: email.into(),
                user_type: Some(UserType::Provider),
            },
            days_ago(60),
        )?;
        let provider = providers.create_at(
            NewProvider {
                user_id: owner.id.to_string(),
                business_name: business.into(),
            },
            days_ago(59),
        )?;
        provider_ids.push(provider.id);
    }

    let catalog = [
        (provider_ids[0], "Full home deep cleaning", Decimal::new(349_900, 2)),
        (provider_ids[1], "Leak repair visit", Decimal::new(49_900, 2)),
        (provider_ids[0], "Sofa shampooing", Decimal::new(129_900, 2)),
    ];
    let mut listing_ids = Vec::with_capacity(catalog.len());
    for (provider_id, title, price) in catalog {
        let listing = listings.create_at(
            NewListing {
                provider_id: provider_id.to_string(),
                title: title.into(),
                price: Some(price),
                active: Some(true),
            },
            days_ago(55),
        )?;
        listing_ids.push(listing.id);
    }

    for (customer, listing, status, age) in BOOKINGS {
        bookings.create_at(
            NewBooking {
                user_id: customer_ids[customer].to_string(),
                listing_id: listing_ids[listing].to_string(),
                amount: None,
            },
            status,
            days_ago(age),
        )?;
    }

    info!(
        users = CUSTOMERS.len() + PROVIDERS.len() + 1,
        bookings = BOOKINGS.len(),
        "Seeded demo data"
    );
    Ok(())
}
