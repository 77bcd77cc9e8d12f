use std::sync::Arc;

use restock_core::config::{AppConfig, ConfigError};
use restock_core::errors::DomainError;
use restock_core::replenishment::ReplenishmentEngine;
use restock_db::{connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub engine: Arc<ReplenishmentEngine>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid replenishment policy: {0}")]
    Policy(#[source] DomainError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    config.validate()?;

    let engine = ReplenishmentEngine::new(config.replenishment.policy())
        .map_err(BootstrapError::Policy)?;

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        window_weeks = engine.policy().window_weeks,
        fallback_multiplier = engine.policy().fallback_multiplier,
        "database migrations applied"
    );

    Ok(Application { config, db_pool, engine: Arc::new(engine) })
}
