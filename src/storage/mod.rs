//! Synchronous key-value persistence.
//!
//! Every document the store keeps (each task list, the streak, the settings,
//! scalar flags) is one string value under one key.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),
}

impl StorageError {
    pub fn invalid_key(key: impl Into<String>) -> Self {
        StorageError::InvalidKey(key.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A string-keyed store of string documents.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

// 允许 Box<dyn KeyValueStore> 直接作为存储使用
impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
