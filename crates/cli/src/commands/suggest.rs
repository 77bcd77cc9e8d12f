use serde::Serialize;

use crate::commands::{
    current_thread_runtime, load_config, open_pool, CommandFailure, CommandResult, FailureClass,
};
use restock_core::domain::product::ProductId;
use restock_core::errors::SuggestionError;
use restock_core::replenishment::{ReplenishmentEngine, Suggestion};
use restock_db::repositories::{SqlSaleRepository, SqlStockRepository};

#[derive(Debug, Serialize)]
struct SuggestionReport<'a> {
    command: &'static str,
    status: &'static str,
    suggestion: &'a Suggestion,
}

pub fn run(raw_product_id: i64, json_output: bool) -> CommandResult {
    match compute(raw_product_id) {
        Ok(suggestion) if json_output => render_json(&suggestion),
        Ok(suggestion) => CommandResult::success("suggest", render_human(&suggestion)),
        Err(failure) => CommandResult::failure("suggest", failure),
    }
}

fn compute(raw_product_id: i64) -> Result<Suggestion, CommandFailure> {
    let product_id = ProductId::parse(raw_product_id)
        .map_err(|error| CommandFailure::new(FailureClass::InvalidInput, error.to_string()))?;
    let config = load_config()?;
    let engine = ReplenishmentEngine::new(config.replenishment.policy())
        .map_err(|error| CommandFailure::new(FailureClass::ConfigValidation, error.to_string()))?;
    let runtime = current_thread_runtime()?;

    runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let sales = SqlSaleRepository::new(pool.clone());
        let stock = SqlStockRepository::new(pool.clone());
        let outcome = engine.suggest(product_id, &sales, &stock).await.map_err(|error| {
            let class = match &error {
                SuggestionError::NoSalesHistory { .. } => FailureClass::NotFound,
                SuggestionError::Accessor(_) => FailureClass::Persistence,
            };
            CommandFailure::new(class, error.to_string())
        });

        pool.close().await;
        outcome
    })
}

fn render_human(suggestion: &Suggestion) -> String {
    format!(
        "product {}: buy {} units ({}). {}",
        suggestion.product_id,
        suggestion.suggested_quantity,
        suggestion.method.label(),
        suggestion.note
    )
}

fn render_json(suggestion: &Suggestion) -> CommandResult {
    let report = SuggestionReport { command: "suggest", status: "ok", suggestion };
    match serde_json::to_string_pretty(&report) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure(
            "suggest",
            CommandFailure::new(FailureClass::Serialization, error.to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use restock_core::domain::product::ProductId;
    use restock_core::replenishment::{ForecastMethod, Suggestion, SuggestionBasis};

    use super::{render_human, render_json};

    fn fallback_suggestion() -> Suggestion {
        Suggestion {
            product_id: ProductId(202),
            suggested_quantity: 5,
            method: ForecastMethod::FallbackInsufficientData,
            note: "Insufficient data (1 weeks).".to_string(),
            basis: SuggestionBasis::Fallback {
                weeks_observed: 1,
                fallback_quantity: 8,
                current_stock: 3,
            },
        }
    }

    #[test]
    fn human_rendering_leads_with_quantity() {
        assert_eq!(
            render_human(&fallback_suggestion()),
            "product 202: buy 5 units (fallback_insufficient_data). Insufficient data (1 weeks)."
        );
    }

    #[test]
    fn json_rendering_includes_basis() {
        let result = render_json(&fallback_suggestion());
        let payload: serde_json::Value =
            serde_json::from_str(&result.output).expect("valid JSON output");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["suggestion"]["suggested_quantity"], 5);
        assert_eq!(payload["suggestion"]["basis"]["kind"], "fallback");
        assert_eq!(payload["suggestion"]["basis"]["current_stock"], 3);
    }
}
