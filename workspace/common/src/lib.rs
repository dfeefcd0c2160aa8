//! Common transport-layer types shared between the backend and its clients.
//! These structs are the request/response payloads of the HTTP API so a
//! client can deserialize responses without duplicating shapes.

mod accounts;
mod catalog;

pub use accounts::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, UserDto};
pub use catalog::{Director, Genre, Movie};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// A single rejected field of a request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
