//! Choir API gateway library.
//!
//! HTTP surface of the choir administration backend: routing, JWT and
//! access guards, choir scoping, uploads and the OpenAPI document. Business
//! rules live in `choir_service_lib`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod storage;

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use choir_service_lib::infra::Database;
use choir_service_lib::Services;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;
use crate::storage::{HttpObjectStorage, ImageUploader};

/// Connect the database, wire the services and serve HTTP until shutdown.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn Error>> {
    let database = Arc::new(Database::connect(&config.database).await?);
    let services = Arc::new(Services::from_connection(
        database.get_connection(),
        config.jwt.clone(),
    ));

    let storage = Arc::new(HttpObjectStorage::new(&config.storage));
    let uploader = Arc::new(ImageUploader::new(
        storage,
        config.storage.upload_dir.clone(),
    ));

    let state = AppState::new(services, uploader, database);
    let app = create_router(state, &config.cors_allowed_origins);

    let addr: SocketAddr = config.server.addr().parse()?;
    info!(service = %config.server.service_name, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
