//! pt-BR wording for the suggestion endpoint.
//!
//! The engine reports the figures it used; the wire format keeps the field
//! names and phrasing existing consumers of `/sugestao` expect.

use serde::Serialize;

use restock_core::domain::product::ProductId;
use restock_core::replenishment::{Suggestion, SuggestionBasis};

pub const FALLBACK_METHOD_LABEL: &str = "Fallback: Dados Insuficientes";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SuggestionResponse {
    pub produto_id: i64,
    pub quantidade_sugerida: u64,
    pub metodo_previsao: String,
    pub observacao: String,
}

impl From<&Suggestion> for SuggestionResponse {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            produto_id: suggestion.product_id.0,
            quantidade_sugerida: suggestion.suggested_quantity,
            metodo_previsao: method_label(&suggestion.basis),
            observacao: observation(&suggestion.basis),
        }
    }
}

pub fn method_label(basis: &SuggestionBasis) -> String {
    match basis {
        SuggestionBasis::MovingAverage { window_weeks, .. } => {
            format!("Média Móvel Semanal ({window_weeks} semanas)")
        }
        SuggestionBasis::Fallback { .. } => FALLBACK_METHOD_LABEL.to_string(),
    }
}

pub fn observation(basis: &SuggestionBasis) -> String {
    match *basis {
        SuggestionBasis::MovingAverage { .. } => {
            "Sugestão baseada no consumo histórico semanal.".to_string()
        }
        SuggestionBasis::Fallback { weeks_observed, fallback_quantity, current_stock }
            if current_stock >= fallback_quantity =>
        {
            format!(
                "Dados insuficientes ({weeks_observed} semanas). Estoque atual ({current_stock} unidades) já cobre a demanda de fallback."
            )
        }
        SuggestionBasis::Fallback { weeks_observed, fallback_quantity, current_stock } => format!(
            "Dados insuficientes ({weeks_observed} semanas). Sugestão baseada em última venda/média simples ({fallback_quantity} unidades) menos estoque atual ({current_stock} unidades)."
        ),
    }
}

pub fn no_history_message(product_id: ProductId) -> String {
    format!(
        "Dados de venda não encontrados para o produto ID {product_id}. Sem histórico para sugestão."
    )
}

#[cfg(test)]
mod tests {
    use restock_core::domain::product::ProductId;
    use restock_core::replenishment::{ForecastMethod, Suggestion, SuggestionBasis};

    use super::{no_history_message, SuggestionResponse, FALLBACK_METHOD_LABEL};

    fn suggestion(basis: SuggestionBasis, quantity: u64) -> Suggestion {
        let method = match basis {
            SuggestionBasis::MovingAverage { .. } => ForecastMethod::MovingAverage,
            SuggestionBasis::Fallback { .. } => ForecastMethod::FallbackInsufficientData,
        };
        Suggestion {
            product_id: ProductId(101),
            suggested_quantity: quantity,
            method,
            note: String::new(),
            basis,
        }
    }

    #[test]
    fn moving_average_names_the_window() {
        let response = SuggestionResponse::from(&suggestion(
            SuggestionBasis::MovingAverage { window_weeks: 4, weekly_average: 15.25 },
            15,
        ));

        assert_eq!(response.metodo_previsao, "Média Móvel Semanal (4 semanas)");
        assert_eq!(response.observacao, "Sugestão baseada no consumo histórico semanal.");
        assert_eq!(response.quantidade_sugerida, 15);
    }

    #[test]
    fn covered_fallback_mentions_stock() {
        let response = SuggestionResponse::from(&suggestion(
            SuggestionBasis::Fallback { weeks_observed: 3, fallback_quantity: 3, current_stock: 40 },
            0,
        ));

        assert_eq!(response.metodo_previsao, FALLBACK_METHOD_LABEL);
        assert_eq!(
            response.observacao,
            "Dados insuficientes (3 semanas). Estoque atual (40 unidades) já cobre a demanda de fallback."
        );
    }

    #[test]
    fn uncovered_fallback_reports_both_quantities() {
        let response = SuggestionResponse::from(&suggestion(
            SuggestionBasis::Fallback { weeks_observed: 1, fallback_quantity: 8, current_stock: 3 },
            5,
        ));

        assert!(response.observacao.contains("(8 unidades) menos estoque atual (3 unidades)"));
    }

    #[test]
    fn no_history_message_names_the_product() {
        assert!(no_history_message(ProductId(9)).contains("produto ID 9"));
    }
}
