//! Main entry point for the WIIM server.
//!
//! Loads configuration, initializes logging, connects and migrates the
//! database, then serves the HTTP API.

use std::sync::Arc;

use tracing::info;
use wiim_migration::{Migrator, MigratorTrait};
use wiim_persistence::AssetStore;
use wiim_server::{
    model::{AppState, Configuration},
    startup,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let database_connection = configuration.database_connection().await?;
    if configuration.db_migrate() {
        Migrator::up(&database_connection, None).await?;
        info!("Database migrations applied");
    }

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();
    let context_path = configuration.server_context_path();
    let count_limit = configuration.count_limit();

    let store = AssetStore::new(database_connection, count_limit);
    let app_state = Arc::new(AppState::new(configuration, store));

    info!(
        address = %server_address,
        port = server_port,
        context_path = %context_path,
        count_limit = count_limit,
        "Starting WIIM server"
    );

    startup::main_server(app_state, context_path, server_address, server_port)?.await?;

    info!("WIIM server stopped");
    Ok(())
}
