//! Email service for sending transactional emails.
//!
//! [`Mailer`] validates input, stamps the sender identity and hands the
//! message to a [`MailTransport`]. The SMTP transport uses `lettre`; tests
//! inject a mock.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport could not be configured.
    #[error("Invalid transport configuration: {0}")]
    Configuration(String),
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    Build(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    Send(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Payload handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    /// `Name <address>` sender identity.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub text: String,
    /// Optional HTML alternative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Acknowledgment returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    /// Recipients the server accepted.
    pub accepted: Vec<String>,
    /// Raw server response line.
    pub response: String,
}

/// Something that can dispatch a [`MailMessage`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Sends the message and returns the server acknowledgment.
    async fn send_mail(&self, message: &MailMessage) -> Result<DeliveryInfo, TransportError>;
}

/// SMTP transport backed by `lettre`.
///
/// Built once at startup and shared; the underlying pool is reused across sends.
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    /// Creates an SMTP transport.
    ///
    /// Port 465 uses implicit TLS, any other port upgrades with STARTTLS
    /// when the server offers it.
    pub fn from_config(config: &EmailConfig) -> Result<Self, TransportError> {
        let tls_parameters = TlsParameters::new(config.smtp_host.clone())
            .map_err(|e| TransportError::Configuration(e.to_string()))?;
        let tls = if config.implicit_tls() {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.smtp_host.as_str())
                .port(config.smtp_port)
                .tls(tls);

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    /// Converts a payload into a MIME message.
    fn build_message(message: &MailMessage) -> Result<Message, TransportError> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e| TransportError::InvalidAddress(format!("{e}")))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| TransportError::InvalidAddress(format!("{e}")))?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone());

        match &message.html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                html.clone(),
            )),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.text.clone()),
        }
        .map_err(|e| TransportError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send_mail(&self, message: &MailMessage) -> Result<DeliveryInfo, TransportError> {
        let email = Self::build_message(message)?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        let lines: Vec<&str> = response.message().collect();
        Ok(DeliveryInfo {
            accepted: vec![message.to.clone()],
            response: format!("{} {}", response.code(), lines.join(" ")),
        })
    }
}

/// Caller-supplied fields of an outgoing email.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendEmailRequest {
    /// Recipient address.
    pub email: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Plain text body.
    pub message: Option<String>,
    /// Optional HTML alternative.
    pub html: Option<String>,
}

impl SendEmailRequest {
    /// Creates a plain-text request.
    pub fn new(
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            email: Some(email.into()),
            subject: Some(subject.into()),
            message: Some(message.into()),
            html: None,
        }
    }

    /// Adds an HTML alternative.
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// Sends email through an injected transport.
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    sender: String,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("sender", &self.sender)
            .field("transport", &"[dyn MailTransport]")
            .finish()
    }
}

impl Mailer {
    /// Creates a mailer using the sender identity from `config`.
    pub fn new(transport: Arc<dyn MailTransport>, config: &EmailConfig) -> Self {
        Self {
            transport,
            sender: config.sender(),
        }
    }

    /// Returns the `Name <address>` sender identity.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Sends an email.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MailInput` when the recipient, subject or message is
    /// missing, and `AppError::MailDelivery` when the transport fails.
    pub async fn send_email(&self, request: SendEmailRequest) -> AppResult<DeliveryInfo> {
        let SendEmailRequest {
            email,
            subject,
            message,
            html,
        } = request;

        let (Some(to), Some(subject), Some(text)) =
            (non_empty(email), non_empty(subject), non_empty(message))
        else {
            return Err(AppError::MailInput(
                "Email, subject, and message are required".to_string(),
            ));
        };

        let mail = MailMessage {
            from: self.sender.clone(),
            to,
            subject,
            text,
            html: non_empty(html),
        };

        match self.transport.send_mail(&mail).await {
            Ok(info) => {
                info!(subject = %mail.subject, to = %mail.to, "Email sent");
                Ok(info)
            }
            Err(e) => {
                error!(error = %e, to = %mail.to, "Email could not be sent");
                Err(AppError::MailDelivery(e.to_string()))
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod email_tests;
