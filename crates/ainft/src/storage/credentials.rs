//! Remembered API key

use std::sync::Arc;

use ainft_common::Error;

use super::KvStore;

/// Key the API key is stored under
pub const SECRET_KEY: &str = "secret-key";

/// Login key remembered between runs
#[derive(Debug, Clone)]
pub struct Credentials {
    store: Arc<dyn KvStore>,
}

impl Credentials {
    /// Create new [`Credentials`]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Remember a key
    pub async fn remember(&self, key: &str) -> Result<(), Error> {
        let bytes = serde_json::to_vec(key)?;
        self.store.kv_write(SECRET_KEY, &bytes).await
    }

    /// Remembered key, if any
    pub async fn recall(&self) -> Result<Option<String>, Error> {
        match self.store.kv_read(SECRET_KEY).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Forget the remembered key
    pub async fn forget(&self) -> Result<(), Error> {
        self.store.kv_remove(SECRET_KEY).await
    }
}
