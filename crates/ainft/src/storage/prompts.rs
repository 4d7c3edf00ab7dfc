//! Saved prompts

use std::sync::Arc;

use ainft_common::Error;

use super::KvStore;

/// Key the prompt list is stored under
pub const SAVED_PROMPTS_KEY: &str = "saved-prompts";

/// Prompts the user chose to keep
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    store: Arc<dyn KvStore>,
}

impl PromptLibrary {
    /// Create new [`PromptLibrary`]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// All saved prompts, oldest first
    pub async fn list(&self) -> Result<Vec<String>, Error> {
        match self.store.kv_read(SAVED_PROMPTS_KEY).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Save a prompt
    ///
    /// Returns `false` when the exact prompt is already saved or empty.
    pub async fn save(&self, prompt: &str) -> Result<bool, Error> {
        if prompt.trim().is_empty() {
            return Ok(false);
        }

        let mut prompts = self.list().await?;
        if prompts.iter().any(|p| p == prompt) {
            return Ok(false);
        }

        prompts.push(prompt.to_string());
        self.write(&prompts).await?;
        Ok(true)
    }

    /// Delete a prompt, returns whether it was present
    pub async fn delete(&self, prompt: &str) -> Result<bool, Error> {
        let mut prompts = self.list().await?;
        let before = prompts.len();
        prompts.retain(|p| p != prompt);

        if prompts.len() == before {
            return Ok(false);
        }

        self.write(&prompts).await?;
        Ok(true)
    }

    async fn write(&self, prompts: &[String]) -> Result<(), Error> {
        let bytes = serde_json::to_vec(prompts)?;
        self.store.kv_write(SAVED_PROMPTS_KEY, &bytes).await
    }
}
