//! Bazaar API Server
//!
//! Main entry point for the Bazaar admin backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_api::{AppState, create_router};
use bazaar_db::{MarketplaceStore, UserRepository, seed};
use bazaar_shared::{AppConfig, JwtConfig, JwtService, Mailer, SmtpMailTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar=debug,bazaar_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    // The transport is built once and shared by every request
    let transport = SmtpMailTransport::from_config(&config.email)
        .context("Failed to configure SMTP transport")?;
    let mailer = Mailer::new(Arc::new(transport), &config.email);
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        sender = mailer.sender(),
        "Email service configured"
    );

    let store = Arc::new(MarketplaceStore::new());
    if config.server.seed_demo_data {
        seed::seed_demo_data(&store, chrono::Utc::now()).context("Failed to seed demo data")?;
        log_demo_admin_token(&store, &jwt_service);
    }

    let state = AppState {
        store,
        jwt_service: Arc::new(jwt_service),
        mailer: Arc::new(mailer),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Prints a bearer token for the seeded admin so the dashboard can connect.
fn log_demo_admin_token(store: &Arc<MarketplaceStore>, jwt_service: &JwtService) {
    let admin = UserRepository::new(store.clone())
        .list()
        .into_iter()
        .find(|u| u.email == seed::DEMO_ADMIN_EMAIL);

    match admin.map(|a| jwt_service.issue_token(a.id, a.user_type)) {
        Some(Ok(token)) => info!(email = seed::DEMO_ADMIN_EMAIL, %token, "Demo admin token"),
        Some(Err(e)) => warn!(error = %e, "Could not issue demo admin token"),
        None => warn!("Demo admin missing after seeding"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
