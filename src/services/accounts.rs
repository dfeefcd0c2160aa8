use std::sync::Arc;

use common::{RegisterRequest, UpdateProfileRequest};
use store::{CatalogStore, CredentialStore, NewUser, User, UserChanges};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::error::{AppError, Result};

/// User account lifecycle and favorites list management.
#[derive(Clone)]
pub struct AccountService {
    credentials: Arc<dyn CredentialStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl AccountService {
    pub fn new(credentials: Arc<dyn CredentialStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            credentials,
            catalog,
        }
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        request.validate()?;

        let RegisterRequest {
            username,
            password,
            email,
            birth_date,
        } = request;
        let user = self
            .credentials
            .create(NewUser {
                username,
                password,
                email,
                birth_date,
            })
            .await?;
        info!("Registered user ID: {}", user.id);
        Ok(user)
    }

    pub async fn get_all(&self) -> Result<Vec<User>> {
        Ok(self.credentials.list().await?)
    }

    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        self.credentials
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                warn!("User '{}' not found", username);
                AppError::NotFound(format!("User '{}' not found", username))
            })
    }

    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        username: &str,
        request: UpdateProfileRequest,
    ) -> Result<User> {
        request.validate()?;
        if request.is_empty() {
            debug!("Empty profile update for '{}'", username);
        }

        let UpdateProfileRequest {
            password,
            email,
            birth_date,
        } = request;
        Ok(self
            .credentials
            .update(
                username,
                UserChanges {
                    password,
                    email,
                    birth_date,
                },
            )
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn add_favorite(&self, username: &str, movie_id: i32) -> Result<User> {
        if self.catalog.find_by_id(movie_id).await?.is_none() {
            warn!("Movie ID {} not found", movie_id);
            return Err(AppError::NotFound(format!("Movie {} not found", movie_id)));
        }
        Ok(self.credentials.add_favorite(username, movie_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn remove_favorite(&self, username: &str, movie_id: i32) -> Result<User> {
        Ok(self.credentials.remove_favorite(username, movie_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn deregister(&self, username: &str) -> Result<()> {
        self.credentials.delete(username).await?;
        info!("Deregistered user '{}'", username);
        Ok(())
    }
}
