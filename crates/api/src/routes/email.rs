//! Admin outbound email.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::Response,
    routing::post,
};
use bazaar_shared::{AppError, DeliveryInfo, SendEmailRequest};
use tracing::info;

use super::json_body;
use crate::{
    AppState,
    middleware::{AdminUser, error_handler, forward_errors},
    response::ApiResponse,
};

/// Creates the email routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/email", post(send_email))
}

async fn send_email(
    State(state): State<AppState>,
    admin: AdminUser,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DeliveryInfo>>, Response> {
    forward_errors(
        async move {
            let request = json_body(payload)?;
            info!(admin_id = %admin.user_id(), "Admin email requested");
            let delivery = state.mailer.send_email(request).await?;
            Ok::<_, AppError>(ApiResponse::ok(delivery))
        },
        error_handler,
    )
    .await
}
