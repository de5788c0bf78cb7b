//! Liveness probe.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Records currently held by the store.
    pub records: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        records: state.store.record_count(),
    })
}

/// Public routes, mounted outside the auth layer.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::StatusCode;
    use bazaar_db::seed::seed_demo_data;
    use chrono::Utc;

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let app = TestApp::new();
        let (status, body) = app.call("GET", "/api/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["records"], 0);
    }

    #[tokio::test]
    async fn test_health_counts_seeded_records() {
        let app = TestApp::new();
        seed_demo_data(&app.state.store, Utc::now()).unwrap();

        let (_, body) = app.get("/api/health").await;
        // 8 users, 2 providers, 3 listings, 8 bookings
        assert_eq!(body["records"], 21);
    }
}
