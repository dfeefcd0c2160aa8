use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use store::{CredentialStore, User};
use tracing::{debug, info, instrument};

use super::AuthError;

/// JWT payload. `sub` is the user id rendered as a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly minted token and the user it authenticates.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: u64,
    pub user: User,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Exchanges credentials for HS256 bearer tokens and verifies them.
#[derive(Clone)]
pub struct TokenIssuer {
    credentials: Arc<dyn CredentialStore>,
    keys: Arc<Keys>,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(credentials: Arc<dyn CredentialStore>, secret: &str, ttl: Duration) -> Self {
        let keys = Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        };
        Self {
            credentials,
            keys: Arc::new(keys),
            ttl,
        }
    }

    /// Checks a username/password pair and mints a token for that user.
    #[instrument(skip(self, password))]
    pub async fn issue(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let Some(user) = self.credentials.find_by_username(username).await? else {
            self.credentials.verify_unknown_user(password).await?;
            return Err(AuthError::IncorrectUsername);
        };

        if !self.credentials.verify_password(&user, password).await? {
            return Err(AuthError::IncorrectPassword);
        }

        let token = self.mint(&user)?;
        info!("Issued token for user ID: {}", user.id);
        Ok(IssuedToken {
            token,
            expires_in: self.ttl.as_secs(),
            user,
        })
    }

    pub fn mint(&self, user: &User) -> Result<String, AuthError> {
        self.mint_at(user, Utc::now().timestamp())
    }

    /// Mints a token as if it had been issued at `issued_at` (unix seconds).
    pub fn mint_at(&self, user: &User, issued_at: i64) -> Result<String, AuthError> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Checks signature and expiry. Does not look the subject up.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => {
                    debug!("Token rejected: {}", e);
                    AuthError::InvalidToken(e.to_string())
                }
            })
    }
}
