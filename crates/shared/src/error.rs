//! Application-wide error types and the uniform error envelope.
//!
//! Every failure that can reach an HTTP client is an [`AppError`]. The
//! central handler turns it into a [`NormalizedError`] and serializes the
//! [`ErrorEnvelope`] `{ "success": false, "error": [...] }`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Numeric code document stores use for unique index violations.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Message returned for malformed identifiers.
pub const RESOURCE_NOT_FOUND_MESSAGE: &str = "Resource not found";

/// Message returned for unique constraint violations.
pub const DUPLICATE_FIELD_MESSAGE: &str = "Duplicate field value entered";

/// Fallback message when an error carries none.
pub const DEFAULT_MESSAGE: &str = "Something went wrong";

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field path that failed validation.
    pub field: String,
    /// Human readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// An identifier could not be parsed into the expected type.
    #[error("Cast error: {0}")]
    ResourceNotFound(String),

    /// A unique constraint was violated on the named field.
    #[error("Duplicate key on field {field}")]
    Duplicate {
        /// Field carrying the unique index.
        field: String,
    },

    /// One or more fields failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Top-level message, used when `errors` is empty.
        message: String,
        /// Field errors in the order they were detected.
        errors: Vec<FieldError>,
    },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// A well-formed identifier matched no record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Mail input was incomplete.
    #[error("Invalid mail input: {0}")]
    MailInput(String),

    /// The mail transport rejected or failed the delivery.
    ///
    /// The payload is the transport detail. It is logged, never returned to clients.
    #[error("Mail delivery failed: {0}")]
    MailDelivery(String),

    /// Unclassified error carrying an optional status and message.
    #[error("{}", .message.as_deref().unwrap_or(DEFAULT_MESSAGE))]
    Other {
        /// Explicit HTTP status, 500 when absent.
        status_code: Option<u16>,
        /// Client-facing message, [`DEFAULT_MESSAGE`] when absent.
        message: Option<String>,
    },
}

impl AppError {
    /// Builds a validation error from field errors.
    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Builds an unclassified 500 error with a message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Other {
            status_code: None,
            message: Some(message.into()),
        }
    }

    /// Builds an unclassified error with an explicit status.
    pub fn with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self::Other {
            status_code: Some(status_code),
            message: Some(message.into()),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ResourceNotFound(_) | Self::NotFound(_) => 404,
            Self::Duplicate { .. } | Self::Validation { .. } | Self::MailInput(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::MailDelivery(_) => 500,
            Self::Other { status_code, .. } => match status_code {
                Some(code) => *code,
                None => 500,
            },
        }
    }

    /// Returns the error kind name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ResourceNotFound(_) => "CastError",
            Self::Duplicate { .. } => "DuplicateKeyError",
            Self::Validation { .. } => "ValidationError",
            Self::Unauthorized(_) => "UnauthorizedError",
            Self::Forbidden(_) => "ForbiddenError",
            Self::NotFound(_) => "NotFoundError",
            Self::MailInput(_) | Self::MailDelivery(_) => "MailError",
            Self::Other { .. } => "Error",
        }
    }

    /// Returns the duplicate-key code for unique violations.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        match self {
            Self::Duplicate { .. } => Some(DUPLICATE_KEY_CODE),
            _ => None,
        }
    }

    /// Maps the error onto the uniform status and message list.
    #[must_use]
    pub fn normalize(&self) -> NormalizedError {
        let message = match self {
            Self::ResourceNotFound(_) => vec![RESOURCE_NOT_FOUND_MESSAGE.to_string()],
            Self::Duplicate { .. } => vec![DUPLICATE_FIELD_MESSAGE.to_string()],
            Self::Validation { message, errors } => {
                if errors.is_empty() {
                    vec![or_default(message)]
                } else {
                    errors.iter().map(|e| e.message.clone()).collect()
                }
            }
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::MailInput(message) => vec![or_default(message)],
            Self::MailDelivery(_) => vec!["Email could not be sent".to_string()],
            Self::Other { message, .. } => {
                vec![message.as_deref().map_or_else(|| DEFAULT_MESSAGE.to_string(), or_default)]
            }
        };

        NormalizedError {
            status_code: self.status_code(),
            message,
        }
    }
}

fn or_default(message: &str) -> String {
    if message.is_empty() {
        DEFAULT_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

/// Status and ordered messages produced by [`AppError::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    /// HTTP status code.
    pub status_code: u16,
    /// Client-facing messages.
    pub message: Vec<String>,
}

impl NormalizedError {
    /// Wraps the messages in the wire envelope.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            success: false,
            error: self.message.clone(),
        }
    }
}

/// Wire shape of every failed API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Client-facing messages.
    pub error: Vec<String>,
}

/// Loosely-shaped error reported by something outside the crate, e.g. a
/// store driver or a deserialized upstream payload.
///
/// Classified into an [`AppError`] exactly once at the boundary via `From`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawError {
    /// Error kind, e.g. `CastError` or `ValidationError`.
    pub name: Option<String>,
    /// Numeric driver code.
    pub code: Option<i32>,
    /// Top-level message.
    pub message: Option<String>,
    /// Per-field failures in reporting order. Accepts either a map of
    /// `{field: {message}}` or a list of [`FieldError`].
    #[serde(deserialize_with = "field_errors")]
    pub errors: Vec<FieldError>,
    /// Status code the error asked for.
    pub status_code: Option<u16>,
}

/// Reads `errors` in document order from either shape.
fn field_errors<'de, D>(deserializer: D) -> Result<Vec<FieldError>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct FieldErrorsVisitor;

    #[derive(Deserialize)]
    struct Entry {
        #[serde(default)]
        message: String,
    }

    impl<'de> serde::de::Visitor<'de> for FieldErrorsVisitor {
        type Value = Vec<FieldError>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a map of field errors or a list of field errors")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>,
        {
            let mut errors = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((field, entry)) = map.next_entry::<String, Entry>()? {
                errors.push(FieldError::new(field, entry.message));
            }
            Ok(errors)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut errors = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(error) = seq.next_element::<FieldError>()? {
                errors.push(error);
            }
            Ok(errors)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(FieldErrorsVisitor)
}

impl From<RawError> for AppError {
    fn from(raw: RawError) -> Self {
        let message = raw.message.unwrap_or_default();
        match (raw.name.as_deref(), raw.code) {
            (Some("CastError"), _) => Self::ResourceNotFound(message),
            (_, Some(DUPLICATE_KEY_CODE)) => Self::Duplicate {
                field: raw
                    .errors
                    .into_iter()
                    .next()
                    .map(|e| e.field)
                    .unwrap_or_default(),
            },
            (Some("ValidationError"), _) => Self::Validation {
                message,
                errors: raw.errors,
            },
            _ => Self::Other {
                status_code: raw.status_code,
                message: Some(message).filter(|m| !m.is_empty()),
            },
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
