//! Admin user management.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::get,
};
use bazaar_core::marketplace::{NewUser, User};
use bazaar_db::UserRepository;
use bazaar_shared::AppError;

use super::json_body;
use crate::{
    AppState,
    middleware::{AdminUser, error_handler, forward_errors},
    response::ApiResponse,
};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/{id}", get(get_user).delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<ApiResponse<Vec<User>>> {
    ApiResponse::list(UserRepository::new(state.store).list())
}

async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, Response> {
    forward_errors(
        async move { UserRepository::new(state.store).get(&id).map(ApiResponse::ok) },
        error_handler,
    )
    .await
}

async fn create_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), Response> {
    forward_errors(
        async move {
            let input = json_body(payload)?;
            let user = UserRepository::new(state.store).create(input)?;
            Ok::<_, AppError>((StatusCode::CREATED, ApiResponse::ok(user)))
        },
        error_handler,
    )
    .await
}

async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, Response> {
    forward_errors(
        async move {
            UserRepository::new(state.store)
                .delete(&id)
                .map(ApiResponse::ok)
        },
        error_handler,
    )
    .await
}
