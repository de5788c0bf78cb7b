//! Admin dashboard statistics.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::Response,
    routing::get,
};
use bazaar_core::dashboard::{DATE_FORMAT, DashboardData, DashboardService, DateRange};
use bazaar_shared::{AppError, AppResult, FieldError};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::{
    AppState,
    middleware::{AdminUser, error_handler, forward_errors},
    response::ApiResponse,
};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/dashboard", get(get_dashboard))
}

/// Optional inclusive date window, as `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// First day included.
    pub start_date: Option<String>,
    /// Last day included.
    pub end_date: Option<String>,
}

impl DashboardQuery {
    /// Parses both bounds; blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every malformed bound.
    pub fn to_range(&self) -> AppResult<DateRange> {
        let mut errors = Vec::new();
        let start = parse_bound(self.start_date.as_deref(), "startDate", &mut errors);
        let end = parse_bound(self.end_date.as_deref(), "endDate", &mut errors);

        if errors.is_empty() {
            Ok(DateRange::new(start, end))
        } else {
            Err(AppError::validation("Invalid date range", errors))
        }
    }
}

/// Four-digit years only; chrono also parses signed and five-digit years.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

fn parse_bound(raw: Option<&str>, field: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) if YEARS.contains(&date.year()) => Some(date),
        _ => {
            errors.push(FieldError::new(
                field,
                format!("{field} must be a date in YYYY-MM-DD format"),
            ));
            None
        }
    }
}

async fn get_dashboard(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardData>>, Response> {
    forward_errors(
        async move {
            let range = query.to_range()?;
            debug!(admin_id = %admin.user_id(), ?range, "Computing dashboard stats");

            let snapshot = state.store.snapshot();
            Ok::<_, AppError>(ApiResponse::ok(DashboardService::compute(
                &snapshot,
                &range,
                Utc::now(),
            )))
        },
        error_handler,
    )
    .await
}
