//! Shared fixtures for router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use bazaar_db::MarketplaceStore;
use bazaar_shared::{
    DeliveryInfo, EmailConfig, JwtConfig, JwtService, MailMessage, MailTransport, Mailer,
    TransportError, UserType,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};

/// Transport that records messages and optionally refuses them.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<MailMessage>>,
    pub fail_with: Option<String>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send_mail(&self, message: &MailMessage) -> Result<DeliveryInfo, TransportError> {
        if let Some(reason) = &self.fail_with {
            return Err(TransportError::Send(reason.clone()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(DeliveryInfo {
            accepted: vec![message.to.clone()],
            response: "250 OK queued".to_string(),
        })
    }
}

pub struct TestApp {
    pub state: AppState,
    pub transport: Arc<RecordingTransport>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_transport(RecordingTransport::default())
    }

    pub fn with_transport(transport: RecordingTransport) -> Self {
        let transport = Arc::new(transport);
        let state = AppState {
            store: Arc::new(MarketplaceStore::new()),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            mailer: Arc::new(Mailer::new(transport.clone(), &EmailConfig::default())),
        };
        Self { state, transport }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn token(&self, user_type: UserType) -> String {
        self.state
            .jwt_service
            .issue_token(Uuid::new_v4(), user_type)
            .expect("should generate token")
    }

    pub fn admin_token(&self) -> String {
        self.token(UserType::Admin)
    }

    /// Sends a request through the full router and decodes the JSON body.
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Admin GET shortcut.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let token = self.admin_token();
        self.call("GET", uri, Some(&token), None).await
    }

    /// Admin POST shortcut.
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let token = self.admin_token();
        self.call("POST", uri, Some(&token), Some(body)).await
    }
}
