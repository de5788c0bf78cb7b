//! Admin dashboard metrics.
//!
//! This module provides:
//! - Wire types for the metrics endpoint and the flat client-side view
//! - Stats computation over a marketplace snapshot
//! - Display formatting for currency and trends

pub mod format;
pub mod metrics;
pub mod types;

pub use format::{Trend, format_inr, trend_label};
pub use metrics::DashboardService;
pub use types::*;
