//! Admin provider management.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::get,
};
use bazaar_core::marketplace::{NewProvider, Provider};
use bazaar_db::ProviderRepository;
use bazaar_shared::AppError;

use super::json_body;
use crate::{
    AppState,
    middleware::{AdminUser, error_handler, forward_errors},
    response::ApiResponse,
};

/// Creates the provider routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/providers", get(list_providers).post(create_provider))
        .route(
            "/admin/providers/{id}",
            get(get_provider).delete(delete_provider),
        )
}

async fn list_providers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<ApiResponse<Vec<Provider>>> {
    ApiResponse::list(ProviderRepository::new(state.store).list())
}

async fn get_provider(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Provider>>, Response> {
    forward_errors(
        async move {
            ProviderRepository::new(state.store)
                .get(&id)
                .map(ApiResponse::ok)
        },
        error_handler,
    )
    .await
}

async fn create_provider(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<NewProvider>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Provider>>), Response> {
    forward_errors(
        async move {
            let input = json_body(payload)?;
            let provider = ProviderRepository::new(state.store).create(input)?;
            Ok::<_, AppError>((StatusCode::CREATED, ApiResponse::ok(provider)))
        },
        error_handler,
    )
    .await
}

async fn delete_provider(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Provider>>, Response> {
    forward_errors(
        async move {
            ProviderRepository::new(state.store)
                .delete(&id)
                .map(ApiResponse::ok)
        },
        error_handler,
    )
    .await
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_provider_lifecycle() {
        let app = TestApp::new();
        let (_, owner) = app
            .post(
                "/api/admin/users",
                json!({ "name": "Farah", "email": "farah@example.com", "userType": "provider" }),
            )
            .await;
        let owner_id = owner["data"]["id"].as_str().unwrap();

        let (status, created) = app
            .post(
                "/api/admin/providers",
                json!({ "userId": owner_id, "businessName": "Sparkle" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["businessName"], "Sparkle");

        let id = created["data"]["id"].as_str().unwrap();
        let token = app.admin_token();
        let (status, _) = app
            .call("DELETE", &format!("/api/admin/providers/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.get(&format!("/api/admin/providers/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!(["Provider not found"]));
    }

    #[tokio::test]
    async fn test_provider_with_malformed_owner() {
        let app = TestApp::new();
        let (status, body) = app
            .post(
                "/api/admin/providers",
                json!({ "userId": "123", "businessName": "Sparkle" }),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!(["Resource not found"]));
    }
}
