use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::Response,
};
use store::{CredentialStore, User};
use tracing::{debug, trace};

use super::{AuthError, TokenIssuer};
use crate::error::AppError;
use crate::schemas::AppState;

/// The user a protected request was authenticated as. Inserted into the
/// request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Resolves an `Authorization` header to a live user.
#[derive(Clone)]
pub struct AccessGuard {
    tokens: TokenIssuer,
    credentials: Arc<dyn CredentialStore>,
}

impl AccessGuard {
    pub fn new(tokens: TokenIssuer, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            tokens,
            credentials,
        }
    }

    pub async fn authenticate(&self, header: Option<&HeaderValue>) -> Result<User, AuthError> {
        let token = bearer_token(header)?;
        let claims = self.tokens.verify(token)?;

        let id: i32 = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(format!("non numeric subject '{}'", claims.sub)))?;

        // Ids can be reused after a delete, so the username must match too
        match self.credentials.find_by_id(id).await? {
            Some(user) if user.username == claims.username => Ok(user),
            _ => Err(AuthError::UnknownSubject(claims.sub)),
        }
    }
}

/// Extracts the token from `Bearer <token>`. The scheme is case insensitive.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MissingCredentials)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// Route layer guarding every protected route.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    trace!("Authenticating {} {}", req.method(), req.uri().path());
    let user = state
        .guard
        .authenticate(req.headers().get(AUTHORIZATION))
        .await?;

    debug!("Request authenticated as user ID: {}", user.id);
    req.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some(&header("Bearer abc.def.ghi"))).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(Some(&header("bearer  abc"))).unwrap(), "abc");
    }

    #[test]
    fn test_bearer_token_rejects_malformed_headers() {
        for value in ["", "Bearer", "Bearer ", "Basic abc", "abc"] {
            assert!(
                matches!(bearer_token(Some(&header(value))), Err(AuthError::MissingCredentials)),
                "accepted {:?}",
                value
            );
        }
        assert!(matches!(bearer_token(None), Err(AuthError::MissingCredentials)));
    }
}
