//! Bearer token authentication: issuing tokens at login and checking them on
//! every protected route.

pub mod guard;
pub mod token;

pub use guard::{require_auth, AccessGuard, AuthenticatedUser};
pub use token::TokenIssuer;

use store::StoreError;
use thiserror::Error;

/// Why a login or a protected request was refused.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Incorrect username")]
    IncorrectUsername,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Missing or malformed authorization header")]
    MissingCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    Expired,

    /// The token is well formed but its user no longer exists.
    #[error("Token subject '{0}' does not resolve to a user")]
    UnknownSubject(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
