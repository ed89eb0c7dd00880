use std::env;

/// Which persistence backend backs the config store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Sqlite,
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub backend: StorageBackend,
    pub database_url: String,
    pub data_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        let backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("memory") => StorageBackend::Memory,
            Ok("sqlite") => StorageBackend::Sqlite,
            Ok("file") | Err(_) => StorageBackend::File,
            Ok(other) => panic!("STORAGE_BACKEND must be memory, file or sqlite (got '{}')", other),
        };

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            backend,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/botconfig.db".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
        }
    }
}
