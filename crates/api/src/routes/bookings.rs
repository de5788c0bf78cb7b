//! Admin booking management.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::{get, patch},
};
use bazaar_core::marketplace::{Booking, BookingStatus, NewBooking};
use bazaar_db::BookingRepository;
use bazaar_shared::{AppError, AppResult, FieldError};
use serde::Deserialize;

use super::json_body;
use crate::{
    AppState,
    middleware::{AdminUser, error_handler, forward_errors},
    response::ApiResponse,
};

/// Creates the booking routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/bookings", get(list_bookings).post(create_booking))
        .route(
            "/admin/bookings/{id}",
            get(get_booking).delete(delete_booking),
        )
        .route("/admin/bookings/{id}/status", patch(update_booking_status))
}

/// Query parameters for listing bookings.
#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    /// Only return bookings in this status.
    pub status: Option<String>,
}

/// Body of a status change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    #[serde(default)]
    pub status: Option<String>,
}

fn parse_status(raw: Option<&str>) -> AppResult<Option<BookingStatus>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.to_ascii_lowercase()
        .parse()
        .map(Some)
        .map_err(|_: String| {
            AppError::validation(
                "Booking validation failed",
                vec![FieldError::new(
                    "status",
                    "Status must be one of pending, confirmed, completed, cancelled",
                )],
            )
        })
}

async fn list_bookings(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<ApiResponse<Vec<Booking>>>, Response> {
    forward_errors(
        async move {
            let status = parse_status(query.status.as_deref())?;
            Ok::<_, AppError>(ApiResponse::list(
                BookingRepository::new(state.store).list(status),
            ))
        },
        error_handler,
    )
    .await
}

async fn get_booking(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Booking>>, Response> {
    forward_errors(
        async move {
            BookingRepository::new(state.store)
                .get(&id)
                .map(ApiResponse::ok)
        },
        error_handler,
    )
    .await
}

async fn create_booking(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Booking>>), Response> {
    forward_errors(
        async move {
            let input = json_body(payload)?;
            let booking = BookingRepository::new(state.store).create(input)?;
            Ok::<_, AppError>((StatusCode::CREATED, ApiResponse::ok(booking)))
        },
        error_handler,
    )
    .await
}

async fn update_booking_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Booking>>, Response> {
    forward_errors(
        async move {
            let request = json_body(payload)?;
            let status = parse_status(request.status.as_deref())?.ok_or_else(|| {
                AppError::validation(
                    "Booking validation failed",
                    vec![FieldError::new("status", "Please add a status")],
                )
            })?;
            let booking = BookingRepository::new(state.store).update_status(&id, status)?;
            Ok::<_, AppError>(ApiResponse::ok(booking))
        },
        error_handler,
    )
    .await
}

async fn delete_booking(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Booking>>, Response> {
    forward_errors(
        async move {
            BookingRepository::new(state.store)
                .delete(&id)
                .map(ApiResponse::ok)
        },
        error_handler,
    )
    .await
}
