//! Admin dashboard client for Bazaar.
//!
//! This crate provides:
//! - [`StatsFetcher`] and its HTTP implementation [`DashboardClient`]
//! - The admin session guard
//! - [`DashboardPoller`], a cancellable polling loop that drops stale responses

pub mod api;
pub mod poller;
pub mod session;

pub use api::{ClientError, DashboardClient, StatsFetcher};
pub use poller::{
    DashboardPoller, DashboardState, LOAD_ERROR_MESSAGE, MIN_POLL_INTERVAL, PollerOptions,
};
pub use session::{Session, SessionError, require_admin};
