//! Marketplace records and input validation.
//!
//! - `types` - users, providers, listings and bookings
//! - `validation` - field checks run before a record is stored

pub mod types;
pub mod validation;

pub use types::*;
