use std::time::Duration;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{debug, info};

use crate::config::DatabaseSettings;

/// Opens the connection pool described by `settings` and brings the schema up
/// to date.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let mut connection_options = ConnectOptions::new(&settings.url);
    connection_options
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .sqlx_logging(settings.sqlx_logging);
    if let Some(idle_timeout) = settings.idle_timeout_secs {
        connection_options.idle_timeout(Duration::from_secs(idle_timeout));
    }

    let connection = Database::connect(connection_options)
        .await
        .context("Failed to connect to database")?;
    debug!("Database connection established");

    Migrator::up(&connection, None)
        .await
        .context("Failed to apply migrations")?;
    info!("Database schema is up to date");

    Ok(connection)
}
