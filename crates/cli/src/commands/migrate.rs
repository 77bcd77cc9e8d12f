use crate::commands::{
    current_thread_runtime, load_config, open_pool, CommandFailure, CommandResult, FailureClass,
};
use restock_db::{migrations, DbPool};

const HISTORY_TABLES: i64 = 2;

/// Apply pending migrations, then confirm both history tables exist.
pub fn run() -> CommandResult {
    CommandResult::from_outcome("migrate", apply())
}

fn apply() -> Result<String, CommandFailure> {
    let config = load_config()?;
    let runtime = current_thread_runtime()?;

    runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let outcome = migrate_and_inspect(&pool).await;
        pool.close().await;
        outcome.map(|applied| schema_message(applied, config.database.url.as_str()))
    })
}

async fn migrate_and_inspect(pool: &DbPool) -> Result<usize, CommandFailure> {
    migrations::run_pending(pool)
        .await
        .map_err(|error| CommandFailure::new(FailureClass::Migration, error.to_string()))?;

    let tables = migrations::history_table_count(pool)
        .await
        .map_err(|error| CommandFailure::new(FailureClass::Migration, error.to_string()))?;
    if tables != HISTORY_TABLES {
        return Err(CommandFailure::new(
            FailureClass::SchemaIncomplete,
            format!("expected sales_data and stock_data after migrating, found {tables} of 2"),
        ));
    }

    Ok(migrations::MIGRATOR.iter().count())
}

fn schema_message(applied: usize, url: &str) -> String {
    format!("sales_data and stock_data ready at {url} ({applied} migrations applied)")
}
