//! Shared errors, mail sending, auth and configuration for Bazaar.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error taxonomy and the uniform error envelope
//! - Mail sending through an injected transport
//! - JWT session claims
//! - Configuration management

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;

pub use auth::{Claims, UserType};
pub use config::{AppConfig, DashboardConfig, EmailConfig, JwtSettings, ServerConfig};
pub use email::{
    DeliveryInfo, MailMessage, MailTransport, Mailer, SendEmailRequest, SmtpMailTransport,
    TransportError,
};
pub use error::{AppError, AppResult, ErrorEnvelope, FieldError, NormalizedError, RawError};
pub use jwt::{JwtConfig, JwtError, JwtService};
