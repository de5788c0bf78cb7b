//! API route definitions.

use axum::{Router, middleware};
use axum::extract::rejection::JsonRejection;
use bazaar_shared::{AppError, AppResult};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod bookings;
pub mod dashboard;
pub mod email;
pub mod health;
pub mod listings;
pub mod providers;
pub mod users;

/// Creates the public API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::routes())
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything under /admin requires a valid token; handlers add the admin check
    let protected_routes = Router::new()
        .merge(dashboard::routes())
        .merge(users::routes())
        .merge(providers::routes())
        .merge(listings::routes())
        .merge(bookings::routes())
        .merge(email::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    api_routes().merge(protected_routes)
}

/// Turns a body that failed to parse into a validation error.
pub(crate) fn json_body<T>(
    payload: Result<axum::Json<T>, JsonRejection>,
) -> AppResult<T> {
    payload
        .map(|axum::Json(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text(), Vec::new()))
}
