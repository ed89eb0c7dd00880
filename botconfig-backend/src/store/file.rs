//! File-backed backend.
//!
//! One pretty-printed JSON array document holds the whole collection and
//! a separate single-line file holds the encoded credential, matching
//! the layout earlier PHP deployments left on disk. Every write rewrites the
//! whole document; the rewrite goes through a temp file and rename so a
//! crash mid-save never leaves a torn document.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ConfigStore, StoreError};
use crate::models::BotConfig;

const DATA_FILE: &str = "bots_data.json";
const PASSWORD_FILE: &str = "password.txt";

pub struct FileStore {
    data_path: PathBuf,
    password_path: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            data_path: dir.join(DATA_FILE),
            password_path: dir.join(PASSWORD_FILE),
        })
    }

    fn read_all(&self) -> Result<Vec<BotConfig>, StoreError> {
        if !self.data_path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.data_path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn write_all(&self, bots: &[BotConfig]) -> Result<(), StoreError> {
        let tmp = self.data_path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(bots)?)?;
        fs::rename(&tmp, &self.data_path)?;
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn load_credential(&self) -> Result<Option<String>, StoreError> {
        if !self.password_path.exists() {
            return Ok(None);
        }
        let token = fs::read_to_string(&self.password_path)?;
        Ok(Some(token.trim().to_string()))
    }

    fn store_credential(&self, encoded: &str) -> Result<(), StoreError> {
        // check-then-write; concurrent first-use setters race and the
        // first writer wins
        if self.password_path.exists() {
            return Err(StoreError::AlreadySet);
        }
        fs::write(&self.password_path, format!("{}\n", encoded))?;
        Ok(())
    }

    fn list_configs(&self, _scope: &str) -> Result<Vec<BotConfig>, StoreError> {
        self.read_all()
    }

    fn replace_configs(&self, _scope: &str, bots: &[BotConfig]) -> Result<(), StoreError> {
        self.write_all(bots)
    }

    fn delete_config(&self, _scope: &str, bot_id: &str) -> Result<(), StoreError> {
        let mut bots = self.read_all()?;
        bots.retain(|b| b.id != bot_id);
        self.write_all(&bots)
    }
}
