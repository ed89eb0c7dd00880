//! Password check and dispatch to the configured storage backend.
//!
//! Every operation except the initial password set verifies the
//! credential first and never touches the backend on failure. The scope
//! fingerprint handed to the backend is the same encoding used for the
//! stored credential.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::BotConfig;
use crate::store::{ConfigStore, StoreError, VerifyOutcome, check_secret, encode_secret};

pub struct ConfigGateway {
    store: Arc<dyn ConfigStore>,
    // Serializes replace-all and delete. Two concurrent replaces could
    // otherwise interleave the delete+insert pair in the sqlite backend
    // or lose a whole-file rewrite in the file backend.
    write_lock: Mutex<()>,
}

impl ConfigGateway {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// First-use password set. Fails with `AlreadySet` once a credential
    /// exists; there is no rotation path.
    pub fn set_password(&self, secret: &str) -> Result<(), StoreError> {
        self.store.store_credential(&encode_secret(secret))
    }

    pub fn verify(&self, secret: &str) -> Result<VerifyOutcome, StoreError> {
        let stored = self.store.load_credential()?;
        Ok(check_secret(stored.as_deref(), secret))
    }

    /// Valid credential -> scope fingerprint; anything else is rejected
    /// before the storage backend is consulted.
    fn authorize(&self, secret: &str) -> Result<String, StoreError> {
        match self.verify(secret)? {
            VerifyOutcome::Valid => Ok(encode_secret(secret)),
            VerifyOutcome::Unset | VerifyOutcome::Invalid => Err(StoreError::Unauthorized),
        }
    }

    pub fn get_bots(&self, secret: &str) -> Result<Vec<BotConfig>, StoreError> {
        let scope = self.authorize(secret)?;
        self.store.list_configs(&scope)
    }

    pub fn save_bots(&self, secret: &str, bots: &[BotConfig]) -> Result<(), StoreError> {
        let scope = self.authorize(secret)?;
        let _guard = self.write_lock.lock();
        self.store.replace_configs(&scope, bots)
    }

    pub fn delete_bot(&self, secret: &str, bot_id: &str) -> Result<(), StoreError> {
        let scope = self.authorize(secret)?;
        let _guard = self.write_lock.lock();
        self.store.delete_config(&scope, bot_id)
    }

    /// Unauthenticated snapshot, see [`ConfigStore::published`].
    pub fn public_bots(&self) -> Result<Vec<BotConfig>, StoreError> {
        self.store.published()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SqliteStore};
    use serde_json::json;

    fn memory_gateway() -> ConfigGateway {
        ConfigGateway::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_verify_unset_until_first_set() {
        let gw = memory_gateway();
        assert_eq!(gw.verify("hunter2").unwrap(), VerifyOutcome::Unset);
        gw.set_password("hunter2").unwrap();
        assert_eq!(gw.verify("hunter2").unwrap(), VerifyOutcome::Valid);
        assert_eq!(gw.verify("other").unwrap(), VerifyOutcome::Invalid);
    }

    #[test]
    fn test_second_set_rejected_and_token_kept() {
        let gw = memory_gateway();
        gw.set_password("hunter2").unwrap();
        assert!(matches!(
            gw.set_password("other"),
            Err(StoreError::AlreadySet)
        ));
        assert_eq!(gw.verify("hunter2").unwrap(), VerifyOutcome::Valid);
        assert_eq!(gw.verify("other").unwrap(), VerifyOutcome::Invalid);
    }

    #[test]
    fn test_operations_rejected_before_password_set() {
        let gw = memory_gateway();
        assert!(matches!(
            gw.get_bots("hunter2"),
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(
            gw.save_bots("hunter2", &[BotConfig::new("b1")]),
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(
            gw.delete_bot("hunter2", "b1"),
            Err(StoreError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_password_rejected_without_storage_access() {
        let gw = memory_gateway();
        gw.set_password("hunter2").unwrap();
        gw.save_bots("hunter2", &[BotConfig::new("b1")]).unwrap();
        assert!(matches!(gw.get_bots("wrong"), Err(StoreError::Unauthorized)));
        assert!(matches!(
            gw.save_bots("wrong", &[]),
            Err(StoreError::Unauthorized)
        ));
    }

    #[test]
    fn test_save_then_get_round_trip() {
        let gw = memory_gateway();
        gw.set_password("hunter2").unwrap();
        let bots = vec![
            BotConfig::new("b1").with_field("name", json!("Bot1")),
            BotConfig::new("b2").with_field("name", json!("Bot2")),
        ];
        gw.save_bots("hunter2", &bots).unwrap();
        assert_eq!(gw.get_bots("hunter2").unwrap(), bots);
    }

    #[test]
    fn test_second_save_replaces_first() {
        let gw = memory_gateway();
        gw.set_password("hunter2").unwrap();
        gw.save_bots("hunter2", &[BotConfig::new("b1"), BotConfig::new("b2")])
            .unwrap();
        gw.save_bots("hunter2", &[BotConfig::new("b3")]).unwrap();
        let bots = gw.get_bots("hunter2").unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].id, "b3");
    }

    #[test]
    fn test_delete_is_scoped_to_one_id() {
        let gw = memory_gateway();
        gw.set_password("hunter2").unwrap();
        gw.save_bots("hunter2", &[BotConfig::new("b1"), BotConfig::new("b2")])
            .unwrap();
        gw.delete_bot("hunter2", "b1").unwrap();
        let bots = gw.get_bots("hunter2").unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].id, "b2");

        gw.delete_bot("hunter2", "nope").unwrap();
        assert_eq!(gw.get_bots("hunter2").unwrap().len(), 1);
    }

    #[test]
    fn test_sqlite_backend_partitions_by_fingerprint() {
        // With the sqlite backend the configured password owns its own
        // partition; data written under one secret is invisible to rows
        // stored under another fingerprint.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gw.db");
        let store = Arc::new(SqliteStore::new(path.to_str().unwrap()).unwrap());
        let gw = ConfigGateway::new(store.clone());

        gw.set_password("hunter2").unwrap();
        gw.save_bots("hunter2", &[BotConfig::new("b1")]).unwrap();

        // rows left behind by a different fingerprint (e.g. written by a
        // previous deployment) do not leak into this credential's scope
        store
            .replace_configs(&encode_secret("other"), &[BotConfig::new("zz")])
            .unwrap();
        let bots = gw.get_bots("hunter2").unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].id, "b1");
    }

    #[test]
    fn test_public_snapshot_needs_no_password() {
        let gw = memory_gateway();
        gw.set_password("hunter2").unwrap();
        gw.save_bots("hunter2", &[BotConfig::new("b1")]).unwrap();
        assert_eq!(gw.public_bots().unwrap()[0].id, "b1");
    }
}
