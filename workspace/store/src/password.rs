use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{Result, StoreError};

/// Work factor used when none is configured.
pub const DEFAULT_HASH_COST: u32 = DEFAULT_COST;

/// One-way salted password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Derives a salted hash from a plaintext password.
    async fn hash(&self, password: &str) -> Result<String>;

    /// Checks a plaintext password against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// bcrypt hashing, run on the blocking thread pool since it is CPU bound.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || {
            hash(password, cost).map_err(|e| StoreError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| StoreError::Hashing(format!("Task join error: {}", e)))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        // bcrypt compares digests in constant time
        tokio::task::spawn_blocking(move || {
            verify(password, &hash).map_err(|e| StoreError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| StoreError::Hashing(format!("Task join error: {}", e)))?
    }
}
