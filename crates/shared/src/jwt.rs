//! Signing and verifying session tokens.
//!
//! Tokens are HS256 JWTs carrying [`Claims`]; the issuer is checked on every
//! verification so tokens minted for another deployment sharing the secret
//! are refused.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, UserType};
use crate::config::JwtSettings;

/// Issuer stamped into tokens unless configured otherwise.
pub const DEFAULT_ISSUER: &str = "bazaar";

/// Token service settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret.
    pub secret: String,
    /// Expected `iss` claim.
    pub issuer: String,
    /// Lifetime of a session token.
    pub token_ttl: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            token_ttl: Duration::days(1),
        }
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        let ttl_secs = i64::try_from(settings.access_token_expiry_secs).unwrap_or(i64::MAX);
        Self {
            secret: settings.secret.clone(),
            issuer: settings.issuer.clone(),
            token_ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
        }
    }
}

/// Token failures.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// Malformed token, bad signature or wrong issuer.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Token is past its `exp`.
    #[error("token has expired")]
    Expired,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("token_ttl", &self.config.token_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a service from its settings.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    /// Issues a token for `user_id` valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Signing` if the expiry overflows or the token can not
    /// be encoded.
    pub fn issue_token(&self, user_id: Uuid, user_type: UserType) -> Result<String, JwtError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.config.token_ttl)
            .ok_or_else(|| JwtError::Signing("token lifetime out of range".to_string()))?;
        let claims = Claims::new(user_id, user_type, self.config.issuer.clone(), expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` for expired tokens and `JwtError::Invalid`
    /// for anything else that fails verification.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with(issuer: &str, token_ttl: Duration) -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            issuer: issuer.to_string(),
            token_ttl,
        })
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service_with(DEFAULT_ISSUER, Duration::minutes(15));
        let user_id = Uuid::new_v4();

        let token = service.issue_token(user_id, UserType::Admin).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.user_type, UserType::Admin);
        assert_eq!(claims.iss, DEFAULT_ISSUER);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let service = JwtService::new(JwtConfig::default());
        assert!(matches!(
            service.verify("invalid.token.here"),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        // Past the default 60s leeway
        let service = service_with(DEFAULT_ISSUER, Duration::minutes(-10));

        let token = service.issue_token(Uuid::new_v4(), UserType::User).unwrap();
        assert!(matches!(service.verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let staging = service_with("bazaar-staging", Duration::minutes(15));
        let token = staging.issue_token(Uuid::new_v4(), UserType::Admin).unwrap();

        let production = service_with(DEFAULT_ISSUER, Duration::minutes(15));
        assert!(matches!(production.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_other_secret_rejected() {
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        });
        let token = other.issue_token(Uuid::new_v4(), UserType::Admin).unwrap();

        assert!(JwtService::new(JwtConfig::default()).verify(&token).is_err());
    }

    #[test]
    fn test_config_from_settings() {
        let settings = JwtSettings {
            secret: "s".to_string(),
            issuer: "bazaar-test".to_string(),
            access_token_expiry_secs: 3600,
        };

        let config = JwtConfig::from(&settings);
        assert_eq!(config.token_ttl, Duration::hours(1));
        assert_eq!(config.issuer, "bazaar-test");
    }
}
