//! Bearer token authentication and the admin guard.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use bazaar_shared::{AppError, Claims, JwtError};
use tracing::debug;
use uuid::Uuid;

use super::error_handler;
use crate::AppState;

const MISSING_TOKEN: &str = "Authorization header with Bearer token is required";

/// Pulls the token out of an `Authorization` value. The scheme is matched
/// case-insensitively and an empty token counts as missing.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Verifies the bearer token and stashes its [`Claims`] in the request
/// extensions. Requests without a usable token never reach the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token);

    let Some(token) = token else {
        return error_handler(AppError::Unauthorized(MISSING_TOKEN.to_string()));
    };

    let claims = match state.jwt_service.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            let message = if matches!(e, JwtError::Expired) {
                "Token has expired"
            } else {
                "Invalid or malformed token"
            };
            return error_handler(AppError::Unauthorized(message.to_string()));
        }
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Authenticated session of any user type.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Claims>() {
            Some(claims) => Ok(Self(claims.clone())),
            None => Err(error_handler(AppError::Unauthorized(
                MISSING_TOKEN.to_string(),
            ))),
        }
    }
}

/// Session guard for admin-only routes; other user types get a 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl AdminUser {
    /// The admin's user ID.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(error_handler(AppError::Forbidden(format!(
                "User type {} is not authorized to access this route",
                claims.user_type
            ))));
        }
        Ok(Self(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("BEARER  abc ", Some("abc"))]
    #[case("Bearer ", None)]
    #[case("Basic abc", None)]
    #[case("abc", None)]
    fn test_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }
}
