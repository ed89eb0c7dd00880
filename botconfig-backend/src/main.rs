use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod gateway;
mod models;
mod store;

use config::{Config, StorageBackend};
use gateway::ConfigGateway;
use store::{ConfigStore, FileStore, MemoryStore, SqliteStore};

pub struct AppState {
    pub gateway: Arc<ConfigGateway>,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing {} storage backend", config.backend.name());
    let store: Arc<dyn ConfigStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(
            FileStore::new(&config.data_dir).expect("Failed to initialize file store"),
        ),
        StorageBackend::Sqlite => Arc::new(
            SqliteStore::new(&config.database_url).expect("Failed to initialize database"),
        ),
    };
    let gateway = Arc::new(ConfigGateway::new(store));

    log::info!("Starting bot-config server on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                gateway: Arc::clone(&gateway),
                config: config.clone(),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::bots::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
