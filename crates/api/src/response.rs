//! Success envelope shared by every route.

use axum::Json;
use serde::Serialize;

/// `{ "success": true, "data": ... }`, plus `count` on collections.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Number of items when `data` is a collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps a single payload.
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            count: None,
            data,
        })
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wraps a collection and reports its length.
    pub fn list(data: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            count: Some(data.len()),
            data,
        })
    }
}
