//! Capabilities the eraser works through. Each handle is scoped to one user's
//! namespace and handed to the eraser explicitly.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::file::FileEntry;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 error: {0}")]
    S3(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Path '{path}' is outside namespace '{prefix}'")]
    OutsideNamespace { path: String, prefix: String },
}

/// A user's remote file area.
#[async_trait]
pub trait FileNamespace: Send + Sync {
    async fn list(&self) -> Result<Vec<FileEntry>, StorageError>;
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}

/// A user's key-value area.
#[async_trait]
pub trait KvNamespace: Send + Sync {
    /// Removes every key, returning how many were removed.
    async fn clear(&self) -> Result<u64, StorageError>;
}

/// Both namespaces belonging to one user.
#[derive(Clone)]
pub struct UserNamespaces {
    pub files: Arc<dyn FileNamespace>,
    pub kv: Arc<dyn KvNamespace>,
}

/// Hands out namespace handles per user. Carried in `AppState`.
pub trait NamespaceProvider: Send + Sync {
    fn for_user(&self, user_id: Uuid) -> UserNamespaces;
}

/// Object-key prefix of a user's files.
pub fn file_prefix(user_id: Uuid) -> String {
    format!("users/{user_id}/")
}

/// Key prefix of a user's key-value entries.
pub fn kv_prefix(user_id: Uuid) -> String {
    format!("kv:{user_id}:")
}
