use crate::commands::{
    current_thread_runtime, load_config, open_pool, CommandFailure, CommandResult, FailureClass,
};
use restock_db::{migrations, DbPool, DemoDataset, DemoProduct};

pub fn run() -> CommandResult {
    CommandResult::from_outcome("seed", seed())
}

fn seed() -> Result<String, CommandFailure> {
    let config = load_config()?;
    let runtime = current_thread_runtime()?;

    runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let outcome = load_and_verify(&pool).await;
        pool.close().await;
        outcome.map(|products| summary_message(&products))
    })
}

async fn load_and_verify(pool: &DbPool) -> Result<Vec<&'static DemoProduct>, CommandFailure> {
    migrations::run_pending(pool)
        .await
        .map_err(|error| CommandFailure::new(FailureClass::Migration, error.to_string()))?;

    let seed_result = DemoDataset::load(pool)
        .await
        .map_err(|error| CommandFailure::new(FailureClass::SeedExecution, error.to_string()))?;

    let verification = DemoDataset::verify(pool)
        .await
        .map_err(|error| CommandFailure::new(FailureClass::SeedVerification, error.to_string()))?;

    if verification.all_present {
        return Ok(seed_result.products_seeded);
    }
    let failed_checks = verification
        .checks
        .iter()
        .filter_map(|(check, passed)| (!passed).then_some(*check))
        .collect::<Vec<_>>();
    Err(CommandFailure::new(
        FailureClass::SeedVerification,
        verification_failure_message(&failed_checks),
    ))
}

fn summary_message(products: &[&DemoProduct]) -> String {
    let lines = products
        .iter()
        .map(|product| {
            format!(
                "  - product {}: {} (expect {} units via {})",
                product.product_id,
                product.description,
                product.expected_quantity,
                product.expected_method.label()
            )
        })
        .collect::<Vec<_>>();
    format!("demo history loaded for {} products:\n{}", products.len(), lines.join("\n"))
}

fn verification_failure_message(failed_checks: &[&str]) -> String {
    if failed_checks.is_empty() {
        "Some demo history failed to load".to_string()
    } else {
        format!("Demo history verification failed for checks: {}", failed_checks.join(", "))
    }
}
