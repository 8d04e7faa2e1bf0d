//! Subscriber Service Library
//!
//! REST API over houses, rooms, devices and sensor readings, plus the
//! background MQTT listener that stores incoming readings and pushes them
//! to WebSocket clients. It can be run standalone or embedded in the
//! combined binary.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod infra;
pub mod ingest;
pub mod openapi;
pub mod realtime;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::config::SubscriberConfig;
use crate::infra::Database;
use crate::ingest::{run_listener, SensorIngestor};
use crate::realtime::SensorHub;
use crate::repository::{DeviceStore, HouseStore, RoomStore, SensorDataStore};
use crate::routes::{cors_layer, create_router};
use crate::service::{DashboardManager, DeviceManager, HouseManager, RoomManager, SensorDataManager};
use crate::state::AppState;

/// Run the subscriber as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = SubscriberConfig::from_env();
    config.host = host.to_string();
    config.port = port;
    run_server_with_config(config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = SubscriberConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Everything the HTTP server and the listener share.
pub struct Components {
    pub state: AppState,
    pub ingestor: Arc<SensorIngestor>,
}

/// Wire stores, services, hub and ingestor over one database.
pub fn build_components(db: &Database, hub_capacity: usize) -> Components {
    let conn = db.get_connection();

    let houses = Arc::new(HouseStore::new(conn.clone()));
    let rooms = Arc::new(RoomStore::new(conn.clone()));
    let devices = Arc::new(DeviceStore::new(conn.clone()));
    let readings = Arc::new(SensorDataStore::new(conn));
    let hub = SensorHub::new(hub_capacity);

    let state = AppState::new(
        Arc::new(HouseManager::new(houses.clone())),
        Arc::new(RoomManager::new(rooms.clone(), houses.clone(), devices.clone())),
        Arc::new(DeviceManager::new(devices.clone(), rooms.clone())),
        Arc::new(SensorDataManager::new(readings.clone(), devices.clone())),
        Arc::new(DashboardManager::new(houses.clone(), rooms.clone(), devices.clone())),
        hub.clone(),
        Arc::new(db.clone()),
    );

    let ingestor = Arc::new(SensorIngestor::new(
        houses,
        rooms,
        devices,
        readings,
        Arc::new(hub),
    ));

    Components { state, ingestor }
}

/// Build the full application router over a database.
pub fn build_app(db: &Database, config: &SubscriberConfig) -> Result<Router, Box<dyn std::error::Error>> {
    let components = build_components(db, config.hub_channel_capacity);
    Ok(create_router(
        components.state,
        cors_layer(&config.cors_allowed_origin)?,
    ))
}

/// Run the HTTP server and the broker listener with the given configuration.
async fn run_server_with_config(config: SubscriberConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize database
    let db = Database::connect(&config.database).await?;

    let components = build_components(&db, config.hub_channel_capacity);
    let app = create_router(components.state, cors_layer(&config.cors_allowed_origin)?);

    // Broker listener runs for the lifetime of the server
    let listener_task = tokio::spawn(run_listener(
        config.mqtt.clone(),
        config.reconnect_delay,
        components.ingestor,
    ));

    // Build address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Subscriber service listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app).await;

    listener_task.abort();
    served?;

    Ok(())
}
