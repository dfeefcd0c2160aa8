use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use common::FieldError;
use store::StoreError;
use thiserror::Error;
use tracing::{debug, error, warn};
use validator::ValidationErrors;

use crate::auth::AuthError;
use crate::schemas::ErrorResponse;

/// Error returned by services and handlers, rendered as an [`ErrorResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Request validation failed")]
    Validation(Vec<FieldError>),

    /// The message is what the client sees; the concrete cause is only logged.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("The data store is currently unavailable")]
    StoreUnavailable,

    #[error("Origin not allowed")]
    ForbiddenOrigin,

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ForbiddenOrigin => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Conflict(_) => "USERNAME_ALREADY_EXISTS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::StoreUnavailable => "STORE_UNAVAILABLE",
            AppError::ForbiddenOrigin => "ORIGIN_NOT_ALLOWED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUser(username) => {
                AppError::Conflict(format!("Username '{}' already exists", username))
            }
            StoreError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            StoreError::Unavailable(reason) => {
                warn!("Store unavailable: {}", reason);
                AppError::StoreUnavailable
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(store_error) => store_error.into(),
            AuthError::Signing(reason) => AppError::Internal(reason),
            AuthError::IncorrectUsername | AuthError::IncorrectPassword => {
                debug!("Login rejected: {}", err);
                AppError::Unauthorized(INVALID_CREDENTIALS)
            }
            other => {
                debug!("Request rejected: {}", other);
                AppError::Unauthorized(AUTHENTICATION_REQUIRED)
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError {
            field: "body".to_string(),
            message: rejection.body_text(),
        }])
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(vec![FieldError {
            field: "path".to_string(),
            message: rejection.body_text(),
        }])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let (message, details) = match self {
            AppError::Validation(details) => {
                debug!("Validation failed for {} field(s)", details.len());
                ("Request validation failed".to_string(), Some(details))
            }
            AppError::Internal(reason) => {
                error!("Internal error: {}", reason);
                ("Internal server error".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            error: message,
            code,
            success: false,
            details,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::RegisterRequest;
    use validator::Validate;

    #[test]
    fn test_store_errors_map_to_statuses() {
        let cases = [
            (StoreError::DuplicateUser("alice1".into()), StatusCode::CONFLICT),
            (StoreError::NotFound("User 'bob'".into()), StatusCode::NOT_FOUND),
            (StoreError::Unavailable("timeout".into()), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Hashing("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (store_error, status) in cases {
            assert_eq!(AppError::from(store_error).status(), status);
        }
    }

    #[test]
    fn test_login_failures_share_one_message() {
        let username = AppError::from(AuthError::IncorrectUsername);
        let password = AppError::from(AuthError::IncorrectPassword);
        assert_eq!(username.to_string(), password.to_string());
        assert_eq!(username.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_validation_errors_become_field_details() {
        let request = RegisterRequest {
            username: "bob".to_string(),
            password: String::new(),
            email: "a@x.com".to_string(),
            birth_date: None,
        };
        let AppError::Validation(details) = AppError::from(request.validate().unwrap_err()) else {
            panic!("expected a validation error");
        };
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["password", "username"]);
        assert!(details.iter().all(|d| !d.message.is_empty()));
    }
}
