//! Booking repository.

use std::sync::Arc;

use bazaar_core::marketplace::{
    Booking, BookingStatus, NewBooking, validation::validate_new_booking,
};
use bazaar_shared::{AppError, AppResult, FieldError};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::newest_first;
use crate::parse_id;
use crate::store::MarketplaceStore;

/// Booking repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    store: Arc<MarketplaceStore>,
}

impl BookingRepository {
    /// Creates a new booking repository.
    #[must_use]
    pub const fn new(store: Arc<MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Lists bookings, newest first, optionally filtered by status.
    #[must_use]
    pub fn list(&self, status: Option<BookingStatus>) -> Vec<Booking> {
        let bookings: Vec<Booking> = self
            .store
            .bookings
            .iter()
            .filter(|e| status.is_none_or(|s| e.value().status == s))
            .map(|e| e.value().clone())
            .collect();
        newest_first(bookings, |b| b.created_at)
    }

    /// Finds a booking by ID.
    #[must_use]
    pub fn find_by_id(&self, id: Uuid) -> Option<Booking> {
        self.store.bookings.get(&id).map(|b| b.clone())
    }

    /// Finds a booking by raw ID.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`.
    pub fn get(&self, raw_id: &str) -> AppResult<Booking> {
        let id = parse_id(raw_id)?;
        self.find_by_id(id)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    /// Creates a pending booking now.
    ///
    /// # Errors
    ///
    /// Fails on invalid fields, unknown references or an inactive listing.
    pub fn create(&self, input: NewBooking) -> AppResult<Booking> {
        self.create_at(input, BookingStatus::Pending, Utc::now())
    }

    /// Creates a booking with an explicit status and creation time.
    ///
    /// # Errors
    ///
    /// Fails on invalid fields, unknown references or an inactive listing.
    pub fn create_at(
        &self,
        input: NewBooking,
        status: BookingStatus,
        created_at: DateTime<Utc>,
    ) -> AppResult<Booking> {
        validate_new_booking(&input)?;

        let user_id = parse_id(&input.user_id)?;
        let listing_id = parse_id(&input.listing_id)?;

        if !self.store.users.contains_key(&user_id) {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        let listing = self
            .store
            .listings
            .get(&listing_id)
            .map(|l| l.clone())
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        if !listing.active {
            return Err(AppError::validation(
                "Booking validation failed",
                vec![FieldError::new(
                    "listingId",
                    "Listing is not accepting bookings",
                )],
            ));
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id,
            listing_id,
            amount: input.amount.unwrap_or(listing.price),
            status,
            created_at,
        };
        self.store.bookings.insert(booking.id, booking.clone());

        info!(booking_id = %booking.id, %listing_id, status = booking.status.as_str(), "Booking created");
        Ok(booking)
    }

    /// Moves a booking to a new status.
    ///
    /// Completed and cancelled bookings are final.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`,
    /// changes to a final booking a validation error.
    pub fn update_status(&self, raw_id: &str, status: BookingStatus) -> AppResult<Booking> {
        let id = parse_id(raw_id)?;
        let mut booking = self
            .store
            .bookings
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.status != status
            && matches!(
                booking.status,
                BookingStatus::Completed | BookingStatus::Cancelled
            )
        {
            return Err(AppError::validation(
                "Booking validation failed",
                vec![FieldError::new(
                    "status",
                    format!("Booking is already {}", booking.status.as_str()),
                )],
            ));
        }

        let previous = booking.status;
        booking.status = status;
        info!(booking_id = %id, from = previous.as_str(), to = status.as_str(), "Booking status changed");
        Ok(booking.clone())
    }

    /// Deletes a booking.
    ///
    /// # Errors
    ///
    /// Malformed ids yield `ResourceNotFound`, unknown ids `NotFound`.
    pub fn delete(&self, raw_id: &str) -> AppResult<Booking> {
        let id = parse_id(raw_id)?;
        let (_, booking) = self
            .store
            .bookings
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        info!(booking_id = %booking.id, "Booking deleted");
        Ok(booking)
    }
}
