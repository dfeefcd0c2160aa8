//! Persistence boundary of the catalog: user credentials and favorites,
//! movie records, and the password hashing capability they rely on.
//!
//! Callers depend on the [`CredentialStore`] and [`CatalogStore`] traits;
//! the SeaORM implementations are the only ones shipped.

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod password;

mod deadline;

pub use catalog::{CatalogStore, NewMovie, SeaOrmCatalogStore};
pub use credentials::{CredentialStore, NewUser, SeaOrmCredentialStore, User, UserChanges};
pub use error::{Result, StoreError};
pub use password::{BcryptHasher, PasswordHasher, DEFAULT_HASH_COST};

#[cfg(test)]
pub(crate) mod testing {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

    /// In-memory SQLite database with the full schema applied.
    pub async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }
}
