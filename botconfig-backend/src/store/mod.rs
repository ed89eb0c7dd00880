//! Storage backends for the bot-config collection.
//!
//! Three interchangeable backends implement [`ConfigStore`]:
//! - [`MemoryStore`] - in-process map, the browser local-storage variant
//! - [`FileStore`] - one JSON document plus a password file on disk
//! - [`SqliteStore`] - rows partitioned by a scope fingerprint
//!
//! The memory and file variants keep a single global collection and
//! ignore the scope argument; only the sqlite variant partitions data
//! per credential. That asymmetry is deliberate, carried over from the
//! deployments this service replaces, and documented rather than fixed.

mod credential;
mod file;
mod memory;
mod sqlite;

pub use credential::{VerifyOutcome, check_secret, encode_secret};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::models::BotConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or mismatched credential.
    #[error("invalid password")]
    Unauthorized,
    /// A credential already exists; there is no rotation path.
    #[error("password already set")]
    AlreadySet,
    /// The underlying medium failed. Single attempt, no retry.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

/// A persistence backend for the credential and the config collection.
///
/// Every method is a single blocking call with no internal suspension
/// points; handlers call them directly from the request path.
pub trait ConfigStore: Send + Sync {
    /// The stored encoded credential token, if one has been set.
    fn load_credential(&self) -> Result<Option<String>, StoreError>;

    /// Persist the encoded credential. First use wins: fails with
    /// [`StoreError::AlreadySet`] if a credential exists, leaving the
    /// stored token untouched.
    fn store_credential(&self, encoded: &str) -> Result<(), StoreError>;

    /// All configs in the given scope, in insertion order.
    fn list_configs(&self, scope: &str) -> Result<Vec<BotConfig>, StoreError>;

    /// Replace the whole collection for the scope. Never a merge.
    fn replace_configs(&self, scope: &str, bots: &[BotConfig]) -> Result<(), StoreError>;

    /// Remove every config matching `bot_id` within the scope. Deleting
    /// an unknown id succeeds as a no-op.
    fn delete_config(&self, scope: &str, bot_id: &str) -> Result<(), StoreError>;

    /// Snapshot republished on every save for unauthenticated reads.
    /// Only the memory backend maintains one; the others return empty.
    fn published(&self) -> Result<Vec<BotConfig>, StoreError> {
        Ok(Vec::new())
    }
}
