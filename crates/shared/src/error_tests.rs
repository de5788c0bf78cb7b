use super::*;
use proptest::prelude::*;
use rstest::rstest;

#[test]
fn test_cast_error_normalizes_to_404() {
    let normalized = AppError::ResourceNotFound("Invalid ID".into()).normalize();

    assert_eq!(normalized.status_code, 404);
    assert_eq!(normalized.message, vec!["Resource not found"]);
}

#[test]
fn test_duplicate_key_normalizes_to_400() {
    let err = AppError::Duplicate {
        field: "email".into(),
    };
    assert_eq!(err.code(), Some(11000));

    let normalized = err.normalize();
    assert_eq!(normalized.status_code, 400);
    assert_eq!(normalized.message, vec!["Duplicate field value entered"]);
}

#[test]
fn test_validation_error_lists_field_messages() {
    let err = AppError::validation(
        "Validation failed",
        vec![FieldError::new("field", "Invalid input")],
    );

    let normalized = err.normalize();
    assert_eq!(normalized.status_code, 400);
    assert_eq!(normalized.message, vec!["Invalid input"]);
}

#[test]
fn test_validation_error_keeps_field_order() {
    let err = AppError::validation(
        "Validation failed",
        vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("email", "Email is invalid"),
            FieldError::new("age", "Age must be positive"),
        ],
    );

    assert_eq!(
        err.normalize().message,
        vec!["Name is required", "Email is invalid", "Age must be positive"]
    );
}

#[test]
fn test_validation_error_without_fields_falls_back_to_message() {
    let err = AppError::validation("Booking validation failed", Vec::new());

    let normalized = err.normalize();
    assert_eq!(normalized.status_code, 400);
    assert_eq!(normalized.message, vec!["Booking validation failed"]);
}

#[test]
fn test_general_error_defaults_to_500() {
    let normalized = AppError::internal("Something broke").normalize();

    assert_eq!(normalized.status_code, 500);
    assert_eq!(normalized.message, vec!["Something broke"]);
}

#[test]
fn test_general_error_without_message_uses_default() {
    let err = AppError::Other {
        status_code: None,
        message: None,
    };

    assert_eq!(err.to_string(), "Something went wrong");
    assert_eq!(err.normalize().message, vec!["Something went wrong"]);
}

#[test]
fn test_general_error_keeps_own_status() {
    let normalized = AppError::with_status(418, "Teapot").normalize();

    assert_eq!(normalized.status_code, 418);
    assert_eq!(normalized.message, vec!["Teapot"]);
}

#[test]
fn test_mail_delivery_hides_transport_detail() {
    let err = AppError::MailDelivery("535 5.7.8 authentication failed".into());

    let normalized = err.normalize();
    assert_eq!(normalized.status_code, 500);
    assert_eq!(normalized.message, vec!["Email could not be sent"]);
    assert!(err.to_string().contains("535"));
}

#[rstest]
#[case(AppError::Unauthorized("msg".into()), 401)]
#[case(AppError::Forbidden("msg".into()), 403)]
#[case(AppError::NotFound("msg".into()), 404)]
#[case(AppError::MailInput("msg".into()), 400)]
#[case(AppError::MailDelivery("msg".into()), 500)]
fn test_typed_status_codes(#[case] err: AppError, #[case] status: u16) {
    assert_eq!(err.status_code(), status);
    assert_eq!(err.normalize().status_code, status);
}

#[rstest]
#[case(AppError::ResourceNotFound("x".into()), "CastError")]
#[case(AppError::Duplicate { field: "x".into() }, "DuplicateKeyError")]
#[case(AppError::validation("x", Vec::new()), "ValidationError")]
#[case(AppError::internal("x"), "Error")]
fn test_error_names(#[case] err: AppError, #[case] name: &str) {
    assert_eq!(err.name(), name);
}

#[test]
fn test_envelope_shape() {
    let envelope = AppError::ResourceNotFound("abc".into())
        .normalize()
        .envelope();

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "success": false, "error": ["Resource not found"] })
    );
}

#[test]
fn test_raw_cast_error_wins_over_everything() {
    let raw = RawError {
        name: Some("CastError".into()),
        code: Some(DUPLICATE_KEY_CODE),
        message: Some("Cast to ObjectId failed".into()),
        ..RawError::default()
    };

    let normalized = AppError::from(raw).normalize();
    assert_eq!(normalized.status_code, 404);
    assert_eq!(normalized.message, vec!["Resource not found"]);
}

#[test]
fn test_raw_duplicate_code_beats_validation_name() {
    let raw = RawError {
        name: Some("ValidationError".into()),
        code: Some(11000),
        errors: vec![FieldError::new("email", "taken")],
        ..RawError::default()
    };

    let err = AppError::from(raw);
    assert!(matches!(err, AppError::Duplicate { ref field } if field == "email"));
    assert_eq!(err.normalize().message, vec!["Duplicate field value entered"]);
}

#[test]
fn test_raw_validation_from_json() {
    let raw: RawError = serde_json::from_value(serde_json::json!({
        "name": "ValidationError",
        "message": "Booking validation failed",
        "errors": [
            { "field": "userId", "message": "Booking must belong to a user" },
            { "field": "amount", "message": "Amount must be greater than zero" }
        ]
    }))
    .unwrap();

    let normalized = AppError::from(raw).normalize();
    assert_eq!(normalized.status_code, 400);
    assert_eq!(
        normalized.message,
        vec!["Booking must belong to a user", "Amount must be greater than zero"]
    );
}

#[test]
fn test_raw_validation_field_map() {
    let raw: RawError = serde_json::from_value(serde_json::json!({
        "name": "ValidationError",
        "message": "Validation failed",
        "errors": { "field": { "message": "Invalid input" } }
    }))
    .unwrap();

    let normalized = AppError::from(raw).normalize();
    assert_eq!(normalized.status_code, 400);
    assert_eq!(normalized.message, vec!["Invalid input"]);
}

#[test]
fn test_raw_field_map_keeps_document_order() {
    let raw: RawError = serde_json::from_str(
        r#"{
            "name": "ValidationError",
            "errors": {
                "userId": { "message": "Booking must belong to a user", "kind": "required" },
                "amount": { "message": "Amount must be greater than zero" }
            }
        }"#,
    )
    .unwrap();

    assert_eq!(
        raw.errors,
        vec![
            FieldError::new("userId", "Booking must belong to a user"),
            FieldError::new("amount", "Amount must be greater than zero"),
        ]
    );
}

#[test]
fn test_raw_empty_field_map_falls_back_to_message() {
    let raw: RawError = serde_json::from_value(serde_json::json!({
        "name": "ValidationError",
        "message": "Validation failed",
        "errors": {}
    }))
    .unwrap();

    assert_eq!(AppError::from(raw).normalize().message, vec!["Validation failed"]);
}

#[rstest]
#[case(RawError::default(), 500, "Something went wrong")]
#[case(RawError { status_code: Some(418), message: Some("teapot".into()), ..RawError::default() }, 418, "teapot")]
#[case(RawError { name: Some("TypeError".into()), message: Some(String::new()), ..RawError::default() }, 500, "Something went wrong")]
fn test_raw_fallback(#[case] raw: RawError, #[case] status: u16, #[case] message: &str) {
    let normalized = AppError::from(raw).normalize();
    assert_eq!(normalized.status_code, status);
    assert_eq!(normalized.message, vec![message]);
}

proptest! {
    /// Cast errors always map to 404 whatever the offending value.
    #[test]
    fn prop_cast_error_ignores_payload(value in ".*") {
        let normalized = AppError::ResourceNotFound(value).normalize();
        prop_assert_eq!(normalized.status_code, 404);
        prop_assert_eq!(normalized.message, vec![RESOURCE_NOT_FOUND_MESSAGE.to_string()]);
    }

    /// Generic errors report their own status, or 500, and exactly one message.
    #[test]
    fn prop_other_status_and_message(
        status in proptest::option::of(400u16..600),
        message in proptest::option::of("[a-zA-Z ]{1,40}"),
    ) {
        let err = AppError::Other { status_code: status, message: message.clone() };
        let normalized = err.normalize();

        prop_assert_eq!(normalized.status_code, status.unwrap_or(500));
        prop_assert_eq!(
            normalized.message,
            vec![message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string())]
        );
    }

    /// Validation errors produce one message per field error, in order.
    #[test]
    fn prop_validation_message_count(messages in proptest::collection::vec("[a-z]{1,12}", 1..8)) {
        let errors = messages
            .iter()
            .enumerate()
            .map(|(i, m)| FieldError::new(format!("f{i}"), m.clone()))
            .collect();
        let normalized = AppError::validation("ignored", errors).normalize();

        prop_assert_eq!(normalized.status_code, 400);
        prop_assert_eq!(normalized.message, messages);
    }
}
