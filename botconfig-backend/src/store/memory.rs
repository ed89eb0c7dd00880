//! In-process backend.
//!
//! Mirrors the browser local-storage variant: one global collection
//! gated by the credential but not partitioned by it, plus a "public"
//! copy republished under a second key on every save so same-process
//! readers can pull the collection without a password.

use parking_lot::RwLock;

use super::{ConfigStore, StoreError};
use crate::models::BotConfig;

#[derive(Default)]
struct Inner {
    credential: Option<String>,
    bots: Vec<BotConfig>,
    published: Vec<BotConfig>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn load_credential(&self) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().credential.clone())
    }

    fn store_credential(&self, encoded: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.credential.is_some() {
            return Err(StoreError::AlreadySet);
        }
        inner.credential = Some(encoded.to_string());
        Ok(())
    }

    fn list_configs(&self, _scope: &str) -> Result<Vec<BotConfig>, StoreError> {
        Ok(self.inner.read().bots.clone())
    }

    fn replace_configs(&self, _scope: &str, bots: &[BotConfig]) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.bots = bots.to_vec();
        inner.published = bots.to_vec();
        Ok(())
    }

    fn delete_config(&self, _scope: &str, bot_id: &str) -> Result<(), StoreError> {
        self.inner.write().bots.retain(|b| b.id != bot_id);
        Ok(())
    }

    fn published(&self) -> Result<Vec<BotConfig>, StoreError> {
        Ok(self.inner.read().published.clone())
    }
}
