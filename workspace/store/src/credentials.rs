use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::UserDto;
use model::entities::{favorite_movie, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, trace, warn};

use crate::deadline::bounded;
use crate::error::{is_foreign_key_violation, is_unique_violation, Result, StoreError};
use crate::password::PasswordHasher;

/// A stored user account. A pure value: hashing and verification live in
/// [`PasswordHasher`].
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    /// Movie ids in the order they were added
    pub favorite_movie_ids: Vec<i32>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("email", &self.email)
            .field("birth_date", &self.birth_date)
            .field("favorite_movie_ids", &self.favorite_movie_ids)
            .finish()
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            birth_date: user.birth_date,
            favorite_movie_ids: user.favorite_movie_ids,
        }
    }
}

/// Data for a new account. The password is plaintext and hashed by the store.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
}

/// Partial profile change; `None` leaves the field untouched.
#[derive(Clone, Default)]
pub struct UserChanges {
    pub password: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Persistence of user accounts and their favorites lists.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>>;

    async fn list(&self) -> Result<Vec<User>>;

    /// Creates an account, failing with [`StoreError::DuplicateUser`] when the
    /// username is taken.
    async fn create(&self, new_user: NewUser) -> Result<User>;

    async fn verify_password(&self, user: &User, password: &str) -> Result<bool>;

    /// Does the same hashing work as [`CredentialStore::verify_password`] for a
    /// username that has no account, so both login failures take equally long.
    /// Always `false`.
    async fn verify_unknown_user(&self, password: &str) -> Result<bool>;

    async fn update(&self, username: &str, changes: UserChanges) -> Result<User>;

    async fn delete(&self, username: &str) -> Result<()>;

    /// Appends a movie to the favorites list. Adding a movie already present
    /// leaves the list unchanged.
    async fn add_favorite(&self, username: &str, movie_id: i32) -> Result<User>;

    /// Removes every occurrence of a movie from the favorites list.
    async fn remove_favorite(&self, username: &str, movie_id: i32) -> Result<User>;
}

/// [`CredentialStore`] backed by a SeaORM connection.
pub struct SeaOrmCredentialStore {
    db: DatabaseConnection,
    hasher: Arc<dyn PasswordHasher>,
    timeout: Duration,
    /// Hash at the configured cost, compared against on unknown usernames
    decoy_hash: OnceCell<String>,
}

const DECOY_PASSWORD: &str = "decoy-password-never-issued";

impl SeaOrmCredentialStore {
    pub fn new(db: DatabaseConnection, hasher: Arc<dyn PasswordHasher>, timeout: Duration) -> Self {
        Self {
            db,
            hasher,
            timeout,
            decoy_hash: OnceCell::new(),
        }
    }

    async fn user_model(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    async fn existing_user_model(&self, username: &str) -> Result<user::Model> {
        self.user_model(username).await?.ok_or_else(|| {
            warn!("User '{}' not found", username);
            StoreError::NotFound(format!("User '{}'", username))
        })
    }

    async fn with_favorites(&self, model: user::Model) -> Result<User> {
        let favorites = favorite_ids(&self.db, model.id).await?;
        Ok(into_user(model, favorites))
    }
}

async fn favorite_ids<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<i32>> {
    Ok(favorite_movie::Entity::find()
        .filter(favorite_movie::Column::UserId.eq(user_id))
        .order_by_asc(favorite_movie::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|favorite| favorite.movie_id)
        .collect())
}

fn into_user(model: user::Model, favorite_movie_ids: Vec<i32>) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        email: model.email,
        birth_date: model.birth_date,
        favorite_movie_ids,
    }
}

#[async_trait]
impl CredentialStore for SeaOrmCredentialStore {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        trace!("Looking up user by username");
        bounded(self.timeout, "find_by_username", async {
            match self.user_model(username).await? {
                Some(model) => Ok(Some(self.with_favorites(model).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        trace!("Looking up user by id");
        bounded(self.timeout, "find_by_id", async {
            match user::Entity::find_by_id(id).one(&self.db).await? {
                Some(model) => Ok(Some(self.with_favorites(model).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>> {
        bounded(self.timeout, "list_users", async {
            let users = user::Entity::find()
                .order_by_asc(user::Column::Id)
                .all(&self.db)
                .await?;
            let mut favorites: HashMap<i32, Vec<i32>> = HashMap::new();
            for favorite in favorite_movie::Entity::find()
                .order_by_asc(favorite_movie::Column::Id)
                .all(&self.db)
                .await?
            {
                favorites
                    .entry(favorite.user_id)
                    .or_default()
                    .push(favorite.movie_id);
            }
            debug!("Retrieved {} users", users.len());

            Ok(users
                .into_iter()
                .map(|model| {
                    let ids = favorites.remove(&model.id).unwrap_or_default();
                    into_user(model, ids)
                })
                .collect())
        })
        .await
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let NewUser {
            username,
            password,
            email,
            birth_date,
        } = new_user;
        let password_hash = self.hasher.hash(&password).await?;

        let active = user::ActiveModel {
            username: Set(username.clone()),
            password_hash: Set(password_hash),
            email: Set(email),
            birth_date: Set(birth_date),
            ..Default::default()
        };

        trace!("Attempting to insert new user");
        let model = bounded(self.timeout, "create_user", async {
            // The unique index on username makes check and insert a single atomic step
            active.insert(&self.db).await.map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateUser(username.clone())
                } else {
                    StoreError::from(err)
                }
            })
        })
        .await?;

        info!("User created with ID: {}", model.id);
        Ok(into_user(model, Vec::new()))
    }

    async fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        self.hasher.verify(password, &user.password_hash).await
    }

    async fn verify_unknown_user(&self, password: &str) -> Result<bool> {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD))
            .await?;
        self.hasher.verify(password, decoy).await?;
        Ok(false)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, username: &str, changes: UserChanges) -> Result<User> {
        let password_hash = match &changes.password {
            Some(password) => Some(self.hasher.hash(password).await?),
            None => None,
        };

        bounded(self.timeout, "update_user", async {
            let existing = self.existing_user_model(username).await?;
            let mut active: user::ActiveModel = existing.into();
            let mut updated_fields = Vec::new();

            if let Some(password_hash) = password_hash {
                active.password_hash = Set(password_hash);
                updated_fields.push("password");
            }
            if let Some(email) = changes.email {
                active.email = Set(email);
                updated_fields.push("email");
            }
            if let Some(birth_date) = changes.birth_date {
                active.birth_date = Set(Some(birth_date));
                updated_fields.push("birth_date");
            }

            let model = if updated_fields.is_empty() {
                debug!("No fields to update");
                // Nothing changed; an update of an unchanged model is an error in SeaORM
                self.existing_user_model(username).await?
            } else {
                debug!("Updating fields: {}", updated_fields.join(", "));
                active.update(&self.db).await?
            };

            self.with_favorites(model).await
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, username: &str) -> Result<()> {
        bounded(self.timeout, "delete_user", async {
            let existing = self.existing_user_model(username).await?;

            let txn = self.db.begin().await?;
            favorite_movie::Entity::delete_many()
                .filter(favorite_movie::Column::UserId.eq(existing.id))
                .exec(&txn)
                .await?;
            let result = user::Entity::delete_by_id(existing.id).exec(&txn).await?;
            txn.commit().await?;

            if result.rows_affected == 0 {
                // Removed concurrently between lookup and delete
                return Err(StoreError::NotFound(format!("User '{}'", username)));
            }
            info!("User '{}' deleted", username);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn add_favorite(&self, username: &str, movie_id: i32) -> Result<User> {
        bounded(self.timeout, "add_favorite", async {
            let existing = self.existing_user_model(username).await?;

            let favorite = favorite_movie::ActiveModel {
                user_id: Set(existing.id),
                movie_id: Set(movie_id),
                ..Default::default()
            };
            match favorite.insert(&self.db).await {
                Ok(_) => debug!("Movie {} added to favorites", movie_id),
                Err(err) if is_unique_violation(&err) => {
                    debug!("Movie {} already in favorites", movie_id)
                }
                Err(err) if is_foreign_key_violation(&err) => {
                    warn!("Movie {} does not exist", movie_id);
                    return Err(StoreError::NotFound(format!("Movie {}", movie_id)));
                }
                Err(err) => return Err(err.into()),
            }

            self.with_favorites(existing).await
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove_favorite(&self, username: &str, movie_id: i32) -> Result<User> {
        bounded(self.timeout, "remove_favorite", async {
            let existing = self.existing_user_model(username).await?;

            let result = favorite_movie::Entity::delete_many()
                .filter(favorite_movie::Column::UserId.eq(existing.id))
                .filter(favorite_movie::Column::MovieId.eq(movie_id))
                .exec(&self.db)
                .await?;
            debug!("Removed {} favorites entries", result.rows_affected);

            self.with_favorites(existing).await
        })
        .await
    }
}
