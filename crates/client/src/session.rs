//! Client-side session and the admin guard.

use bazaar_shared::UserType;
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "BAZAAR_TOKEN";

/// Environment variable holding the session's user type.
pub const USER_TYPE_ENV: &str = "BAZAAR_USER_TYPE";

/// Signed-in user as seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token sent with every request.
    pub token: String,
    /// Account kind.
    pub user_type: UserType,
}

impl Session {
    /// Creates a session.
    pub fn new(token: impl Into<String>, user_type: UserType) -> Self {
        Self {
            token: token.into(),
            user_type,
        }
    }

    /// Reads the session from `BAZAAR_TOKEN` and `BAZAAR_USER_TYPE`.
    ///
    /// Returns `None` when the token is missing or blank. An unknown user
    /// type is treated as a regular user.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty())?;
        let user_type = std::env::var(USER_TYPE_ENV)
            .ok()
            .and_then(|raw| raw.trim().to_ascii_lowercase().parse().ok())
            .unwrap_or(UserType::User);
        Some(Self::new(token.trim(), user_type))
    }
}

/// Why the dashboard refused to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No admin session; the caller should send the user to the login page.
    #[error("Admin session required, redirecting to login")]
    RedirectToLogin,
}

/// Admits only admin sessions.
///
/// # Errors
///
/// Returns `SessionError::RedirectToLogin` when there is no session or it
/// belongs to a non-admin.
pub fn require_admin(session: Option<&Session>) -> Result<&Session, SessionError> {
    match session {
        Some(session) if session.user_type == UserType::Admin => Ok(session),
        Some(session) => {
            debug!(user_type = %session.user_type, "Non-admin session refused");
            Err(SessionError::RedirectToLogin)
        }
        None => Err(SessionError::RedirectToLogin),
    }
}
