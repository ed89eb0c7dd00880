//! SQLite backend - schema and row operations.
//!
//! Replaces the two near-identical serverless database handlers
//! (Firestore and Supabase) with one table. Rows are partitioned by the
//! scope fingerprint column and each row is stamped with server-assigned
//! timestamps, matching the document layout those functions wrote.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::Connection;

use super::{ConfigStore, StoreError};
use crate::models::BotConfig;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the database and initialize the schema.
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        // Single-row credential table; the CHECK pins it to one row so
        // the insert itself enforces first-use-wins.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS credential (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                token TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS bot_configs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                scope_fingerprint TEXT NOT NULL,
                bot_id TEXT NOT NULL,
                config_data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_bot_configs_scope
             ON bot_configs(scope_fingerprint)",
            [],
        )?;

        Ok(())
    }
}

impl ConfigStore for SqliteStore {
    fn load_credential(&self) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let token = conn
            .query_row("SELECT token FROM credential WHERE id = 1", [], |row| {
                row.get::<_, String>(0)
            })
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        Ok(token)
    }

    fn store_credential(&self, encoded: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let inserted = conn.execute(
            "INSERT INTO credential (id, token, created_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO NOTHING",
            rusqlite::params![encoded, now],
        )?;
        if inserted == 0 {
            return Err(StoreError::AlreadySet);
        }
        Ok(())
    }

    fn list_configs(&self, scope: &str) -> Result<Vec<BotConfig>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT config_data FROM bot_configs
             WHERE scope_fingerprint = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([scope], |row| row.get::<_, String>(0))?;

        let mut bots = Vec::new();
        for row in rows {
            bots.push(serde_json::from_str(&row?)?);
        }
        Ok(bots)
    }

    fn replace_configs(&self, scope: &str, bots: &[BotConfig]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        // One transaction around delete+insert; the serverless handlers
        // ran the pair unwrapped and could be observed half-applied.
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM bot_configs WHERE scope_fingerprint = ?1",
            [scope],
        )?;
        for bot in bots {
            let config_data = serde_json::to_string(bot)?;
            tx.execute(
                "INSERT INTO bot_configs
                    (scope_fingerprint, bot_id, config_data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![scope, bot.id, config_data, now, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_config(&self, scope: &str, bot_id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM bot_configs WHERE scope_fingerprint = ?1 AND bot_id = ?2",
            [scope, bot_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open_store(dir: &tempfile::TempDir) -> SqliteStore {
        let path = dir.path().join("configs.db");
        SqliteStore::new(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_credential_first_use_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        assert_eq!(store.load_credential().unwrap(), None);
        store.store_credential("aHVudGVyMg==").unwrap();
        assert!(matches!(
            store.store_credential("b3RoZXI="),
            Err(StoreError::AlreadySet)
        ));
        assert_eq!(
            store.load_credential().unwrap().as_deref(),
            Some("aHVudGVyMg==")
        );
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let bots = vec![
            BotConfig::new("b2").with_field("name", json!("Second")),
            BotConfig::new("b1").with_field("name", json!("First")),
        ];
        store.replace_configs("scope-a", &bots).unwrap();
        assert_eq!(store.list_configs("scope-a").unwrap(), bots);
    }

    #[test]
    fn test_scopes_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store
            .replace_configs("scope-a", &[BotConfig::new("b1")])
            .unwrap();
        assert!(store.list_configs("scope-b").unwrap().is_empty());

        store
            .replace_configs("scope-b", &[BotConfig::new("b9")])
            .unwrap();
        assert_eq!(store.list_configs("scope-a").unwrap()[0].id, "b1");
    }

    #[test]
    fn test_replace_overwrites_scope() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store
            .replace_configs("scope-a", &[BotConfig::new("b1"), BotConfig::new("b2")])
            .unwrap();
        store
            .replace_configs("scope-a", &[BotConfig::new("b3")])
            .unwrap();
        let bots = store.list_configs("scope-a").unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].id, "b3");
    }

    #[test]
    fn test_delete_within_scope_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store
            .replace_configs("scope-a", &[BotConfig::new("b1"), BotConfig::new("b2")])
            .unwrap();
        store
            .replace_configs("scope-b", &[BotConfig::new("b1")])
            .unwrap();

        store.delete_config("scope-a", "b1").unwrap();
        assert_eq!(store.list_configs("scope-a").unwrap()[0].id, "b2");
        assert_eq!(store.list_configs("scope-b").unwrap()[0].id, "b1");

        // unknown id is a no-op
        store.delete_config("scope-a", "missing").unwrap();
        assert_eq!(store.list_configs("scope-a").unwrap().len(), 1);
    }
}
