//! Central error handler.
//!
//! Every failure a route produces ends up here, so the wire shape of errors
//! is decided in exactly one place.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_shared::{AppError, NormalizedError};
use tracing::error;

/// Logs the failure and renders its normalized envelope.
///
/// The status comes from [`AppError::normalize`]; a status that is not a
/// valid HTTP code falls back to 500.
pub fn error_handler(err: AppError) -> Response {
    let normalized = err.normalize();
    error!(
        error_name = err.name(),
        status = normalized.status_code,
        detail = %err,
        "{}",
        log_line(&err, &normalized)
    );

    let status = StatusCode::from_u16(normalized.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(normalized.envelope())).into_response()
}

/// `name: message` with the client-facing messages joined.
fn log_line(err: &AppError, normalized: &NormalizedError) -> String {
    format!("{}: {}", err.name(), normalized.message.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_shared::{ErrorEnvelope, FieldError};
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn envelope(response: Response) -> ErrorEnvelope {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_cast_error_renders_404() {
        let response = error_handler(AppError::ResourceNotFound("123".into()));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = envelope(response).await;
        assert!(!body.success);
        assert_eq!(body.error, vec!["Resource not found"]);
    }

    #[tokio::test]
    async fn test_validation_messages_keep_order() {
        let response = error_handler(AppError::validation(
            "User validation failed",
            vec![
                FieldError::new("name", "Please add a name"),
                FieldError::new("email", "Please add an email"),
            ],
        ));

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            envelope(response).await.error,
            vec!["Please add a name", "Please add an email"]
        );
    }

    #[rstest]
    #[case(AppError::with_status(403, "Not allowed"), StatusCode::FORBIDDEN)]
    #[case(AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::with_status(1000, "odd"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::Duplicate { field: "email".into() }, StatusCode::BAD_REQUEST)]
    #[tokio::test]
    async fn test_status_mapping(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(error_handler(err).status(), expected);
    }

    #[rstest]
    #[case(AppError::ResourceNotFound("123".into()), "CastError: Resource not found")]
    #[case(
        AppError::validation(
            "User validation failed",
            vec![
                FieldError::new("name", "Please add a name"),
                FieldError::new("email", "Please add an email"),
            ],
        ),
        "ValidationError: Please add a name, Please add an email"
    )]
    #[case(AppError::MailDelivery("535 auth".into()), "MailError: Email could not be sent")]
    fn test_log_line_names_kind_once(#[case] err: AppError, #[case] expected: &str) {
        assert_eq!(log_line(&err, &err.normalize()), expected);
    }
}
