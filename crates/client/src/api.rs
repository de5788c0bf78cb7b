//! HTTP access to the admin metrics endpoint.

use std::time::Duration;

use async_trait::async_trait;
use bazaar_core::dashboard::{DashboardData, DashboardStats, DateRange};
use bazaar_shared::{DashboardConfig, ErrorEnvelope};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Path of the metrics endpoint relative to the base URL.
pub const DASHBOARD_PATH: &str = "/api/admin/dashboard";

/// Failures while fetching stats.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or body errors.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error envelope.
    #[error("API returned {status}: {}", .messages.join(", "))]
    Api {
        /// HTTP status.
        status: u16,
        /// Messages from the envelope.
        messages: Vec<String>,
    },

    /// The client could not be built.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

/// Source of dashboard stats for a date range.
#[async_trait]
pub trait StatsFetcher: Send + Sync {
    /// Fetches the stats for `range`.
    async fn fetch_stats(&self, range: &DateRange) -> Result<DashboardStats, ClientError>;
}

#[derive(Deserialize)]
struct SuccessEnvelope {
    data: DashboardData,
}

/// `reqwest` client for the metrics endpoint.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl DashboardClient {
    /// Creates a client that authenticates with `token`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client can not be built.
    pub fn new(config: &DashboardConfig, token: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}{DASHBOARD_PATH}", config.base_url.trim_end_matches('/')),
            token: token.into(),
        })
    }

    /// Full URL of the metrics endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatsFetcher for DashboardClient {
    async fn fetch_stats(&self, range: &DateRange) -> Result<DashboardStats, ClientError> {
        let response = self
            .http
            .get(&self.endpoint)
            .bearer_auth(&self.token)
            .query(&range.query_pairs())
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), ?range, "Dashboard response");

        if !status.is_success() {
            let messages = response
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error)
                .unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                messages,
            });
        }

        let envelope: SuccessEnvelope = response.json().await?;
        Ok(envelope.data.into())
    }
}
