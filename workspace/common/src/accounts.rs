use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn alphanumeric(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("alphanumeric");
        error.message = Some("Username contains non alphanumeric characters - not allowed.".into());
        Err(error)
    }
}

/// Request body for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct RegisterRequest {
    /// At least 5 characters, letters and digits only
    #[validate(
        length(min = 5, message = "Username must be at least 5 characters long."),
        custom(function = "alphanumeric")
    )]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
    #[validate(email(message = "Email does not appear to be valid."))]
    pub email: String,
    pub birth_date: Option<NaiveDate>,
}

/// Request body for a partial profile update. Absent fields are left as they are.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: Option<String>,
    #[validate(email(message = "Email does not appear to be valid."))]
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.password.is_none() && self.email.is_none() && self.birth_date.is_none()
    }
}

/// User response model. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub favorite_movie_ids: Vec<i32>,
}

/// Credentials exchanged for a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued bearer token and the user it was issued for.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: u64,
    pub user: UserDto,
}
