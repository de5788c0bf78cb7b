//! Admin listing management.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::get,
};
use bazaar_core::marketplace::{Listing, NewListing};
use bazaar_db::ListingRepository;
use bazaar_shared::AppError;

use super::json_body;
use crate::{
    AppState,
    middleware::{AdminUser, error_handler, forward_errors},
    response::ApiResponse,
};

/// Creates the listing routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/listings", get(list_listings).post(create_listing))
        .route(
            "/admin/listings/{id}",
            get(get_listing).delete(delete_listing),
        )
}

async fn list_listings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<ApiResponse<Vec<Listing>>> {
    ApiResponse::list(ListingRepository::new(state.store).list())
}

async fn get_listing(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Listing>>, Response> {
    forward_errors(
        async move {
            ListingRepository::new(state.store)
                .get(&id)
                .map(ApiResponse::ok)
        },
        error_handler,
    )
    .await
}

async fn create_listing(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<NewListing>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Listing>>), Response> {
    forward_errors(
        async move {
            let input = json_body(payload)?;
            let listing = ListingRepository::new(state.store).create(input)?;
            Ok::<_, AppError>((StatusCode::CREATED, ApiResponse::ok(listing)))
        },
        error_handler,
    )
    .await
}

async fn delete_listing(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Listing>>, Response> {
    forward_errors(
        async move {
            ListingRepository::new(state.store)
                .delete(&id)
                .map(ApiResponse::ok)
        },
        error_handler,
    )
    .await
}
