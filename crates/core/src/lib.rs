//! Core marketplace logic for Bazaar.
//!
//! Pure business logic: no web framework, no storage.
//!
//! # Modules
//!
//! - `marketplace` - Users, providers, listings, bookings and their validation
//! - `dashboard` - Admin metrics computation and display formatting

pub mod dashboard;
pub mod marketplace;
