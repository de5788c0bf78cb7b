//! Marketplace data types.

use bazaar_shared::UserType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Account kind.
    pub user_type: UserType,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Service provider profile attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Provider ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Public business name.
    pub business_name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Bookable service offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Listing ID.
    pub id: Uuid,
    /// Owning provider.
    pub provider_id: Uuid,
    /// Title.
    pub title: String,
    /// Price per booking.
    pub price: Decimal,
    /// Whether the listing accepts bookings.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting provider confirmation.
    Pending,
    /// Accepted by the provider.
    Confirmed,
    /// Service delivered; counts towards revenue.
    Completed,
    /// Cancelled by either side.
    Cancelled,
}

impl BookingStatus {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// A customer's booking of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking ID.
    pub id: Uuid,
    /// Customer.
    pub user_id: Uuid,
    /// Booked listing.
    pub listing_id: Uuid,
    /// Charged amount.
    pub amount: Decimal,
    /// Current status.
    pub status: BookingStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Account kind, `user` when absent.
    pub user_type: Option<UserType>,
}

/// Payload for creating a provider.
///
/// References are raw strings; malformed ids surface as resource-not-found.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProvider {
    /// Owning user ID.
    #[serde(default)]
    pub user_id: String,
    /// Public business name.
    #[serde(default)]
    pub business_name: String,
}

/// Payload for creating a listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    /// Owning provider ID.
    #[serde(default)]
    pub provider_id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Price per booking.
    pub price: Option<Decimal>,
    /// Whether the listing accepts bookings, `true` when absent.
    pub active: Option<bool>,
}

/// Payload for creating a booking.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    /// Customer ID.
    #[serde(default)]
    pub user_id: String,
    /// Listing ID.
    #[serde(default)]
    pub listing_id: String,
    /// Charged amount, the listing price when absent.
    pub amount: Option<Decimal>,
}

/// Point-in-time copy of every collection, used for stats.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceSnapshot {
    /// All users.
    pub users: Vec<User>,
    /// All providers.
    pub providers: Vec<Provider>,
    /// All listings.
    pub listings: Vec<Listing>,
    /// All bookings.
    pub bookings: Vec<Booking>,
}
