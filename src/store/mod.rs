//! Local key-value store.
//!
//! Session identifiers and a few cached scalars live in a flat key→string
//! mapping. Callers go through the [`KeyValueStore`] trait so screens and
//! services can be exercised against [`MemoryStore`] in tests while the CLI
//! persists to SQLite through [`SqliteStore`].

pub mod repo;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;

pub use repo::{init_pool, run_migrations, Pool};

/// Well-known keys written by the client.
pub mod keys {
    pub const USER_ID: &str = "user_id";
    pub const USER_NAME: &str = "user_name";
    pub const USER_TYPE: &str = "user_type";
    pub const TOKEN: &str = "token";
    pub const CART_COUNT: &str = "cartval";
    pub const DELIVERY_CHARGE: &str = "delcharge";
    pub const MIN_QTY: &str = "min_qty";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const DEVICE_ID: &str = "device_id";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("storage migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("storage directory error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

/// SQLite-backed store used by the CLI.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool,
}

impl SqliteStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `database_url` and apply migrations.
    pub async fn open(database_url: &str) -> Result<Self, StoreError> {
        let pool = init_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        repo::get_value(&self.pool, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        repo::set_value(&self.pool, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        repo::remove_value(&self.pool, key).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        repo::remove_all(&self.pool).await
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.lock().await.clear();
        Ok(())
    }
}
