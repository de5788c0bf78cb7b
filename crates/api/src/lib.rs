//! Admin HTTP API for the Bazaar marketplace.
//!
//! Every route lives under `/api`. Apart from `/api/health`, requests need a
//! bearer token, and the admin routes additionally require `user_type = admin`.
//! Handlers run through [`middleware::forward_errors`] so every failure ends up
//! in [`middleware::error_handler`] and leaves as the same JSON envelope.

pub mod middleware;
pub mod response;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::Router;
use bazaar_db::MarketplaceStore;
use bazaar_shared::{JwtService, Mailer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared handles cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Marketplace records.
    pub store: Arc<MarketplaceStore>,
    /// Verifies bearer tokens.
    pub jwt_service: Arc<JwtService>,
    /// Outbound mail, sharing one transport.
    pub mailer: Arc<Mailer>,
}

/// Builds the full router with tracing and permissive CORS for the admin UI.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
