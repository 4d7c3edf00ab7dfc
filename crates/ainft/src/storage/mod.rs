//! Local key-value persistence
//!
//! Saved prompts and the remembered API key are small JSON values stored
//! under fixed keys.

use std::collections::HashMap;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ainft_common::Error;
use async_trait::async_trait;
use tokio::sync::RwLock;

pub mod credentials;
pub mod prompts;

pub use credentials::Credentials;
pub use prompts::PromptLibrary;

/// Valid ASCII characters for keys
pub const KVSTORE_KEY_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

/// Maximum key length
pub const KVSTORE_KEY_MAX_LEN: usize = 120;

/// Validates that a key only uses the allowed characters and length
pub fn validate_key(key: &str) -> Result<(), Error> {
    if key.is_empty() || key.len() > KVSTORE_KEY_MAX_LEN {
        return Err(Error::Storage(format!(
            "Key must be between 1 and {KVSTORE_KEY_MAX_LEN} characters"
        )));
    }

    if !key.chars().all(|c| KVSTORE_KEY_ALPHABET.contains(c)) {
        return Err(Error::Storage(
            "key contains invalid characters. Only ASCII letters, numbers, underscore, and hyphen are allowed"
                .to_string(),
        ));
    }

    Ok(())
}

/// Key-Value Store trait
#[async_trait]
pub trait KvStore: Debug + Send + Sync {
    /// Read value from key-value store
    async fn kv_read(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Write value to key-value store
    async fn kv_write(&self, key: &str, value: &[u8]) -> Result<(), Error>;

    /// Remove value from key-value store
    async fn kv_remove(&self, key: &str) -> Result<(), Error>;

    /// List keys
    async fn kv_list(&self) -> Result<Vec<String>, Error>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create new [`MemoryStore`]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn kv_read(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        validate_key(key)?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn kv_write(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        validate_key(key)?;
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn kv_remove(&self, key: &str) -> Result<(), Error> {
        validate_key(key)?;
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn kv_list(&self) -> Result<Vec<String>, Error> {
        let mut keys: Vec<String> = self.values.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// One JSON file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create new [`FileStore`], creating `dir` if needed
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn kv_read(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        validate_key(key)?;
        match tokio::fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn kv_write(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        validate_key(key)?;
        tokio::fs::write(self.path(key), value).await?;
        Ok(())
    }

    async fn kv_remove(&self, key: &str) -> Result<(), Error> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.path(key)).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    async fn kv_list(&self) -> Result<Vec<String>, Error> {
        let mut keys = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
