use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Number of history tables present; 2 once the schema is migrated.
pub async fn history_table_count(pool: &DbPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(1) FROM sqlite_master
         WHERE type = 'table' AND name IN ('sales_data', 'stock_data')",
    )
    .fetch_one(pool)
    .await
}
