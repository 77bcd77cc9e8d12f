//! Ingestion and suggestion routes.
//!
//! - `GET  /`                      : liveness message
//! - `POST /dados/vendas`          : ingest one sale record
//! - `POST /dados/estoque`         : ingest one stock snapshot
//! - `GET  /sugestao/{produto_id}` : purchase suggestion for a product

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use restock_core::domain::product::ProductId;
use restock_core::domain::sale::NewSale;
use restock_core::domain::stock::NewStockSnapshot;
use restock_core::errors::{DomainError, InterfaceError, SuggestionError};
use restock_core::replenishment::ReplenishmentEngine;
use restock_db::repositories::{
    RepositoryError, SaleRepository, SqlSaleRepository, SqlStockRepository, StockRepository,
};
use restock_db::DbPool;

use crate::presentation::{no_history_message, SuggestionResponse};

pub const ONLINE_MESSAGE: &str = "restock suggestion service is online";

#[derive(Clone)]
pub struct ApiState {
    sales: Arc<dyn SaleRepository>,
    stock: Arc<dyn StockRepository>,
    engine: Arc<ReplenishmentEngine>,
}

impl ApiState {
    pub fn new(
        sales: Arc<dyn SaleRepository>,
        stock: Arc<dyn StockRepository>,
        engine: Arc<ReplenishmentEngine>,
    ) -> Self {
        Self { sales, stock, engine }
    }

    pub fn from_pool(db_pool: DbPool, engine: Arc<ReplenishmentEngine>) -> Self {
        Self::new(
            Arc::new(SqlSaleRepository::new(db_pool.clone())),
            Arc::new(SqlStockRepository::new(db_pool)),
            engine,
        )
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SaleIngestRequest {
    pub produto_id: i64,
    pub quantidade: i64,
    pub valor_unitario: Decimal,
    pub data_venda: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct StockIngestRequest {
    pub produto_id: i64,
    pub quantidade_atual: i64,
    pub data_registro: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub id: i64,
}

/// Error body; `detail` matches the key existing `/sugestao` consumers read.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
    pub correlation_id: String,
}

type ApiRejection = (StatusCode, Json<ApiError>);

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/dados/vendas", post(ingest_sale))
        .route("/dados/estoque", post(ingest_stock))
        .route("/sugestao/{produto_id}", get(suggest))
        .with_state(state)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse { message: ONLINE_MESSAGE.to_string() })
}

async fn ingest_sale(
    State(state): State<ApiState>,
    Json(body): Json<SaleIngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiRejection> {
    let correlation_id = Uuid::new_v4().to_string();

    let sale = validate_sale(body).map_err(|error| reject(error.into_interface(&correlation_id)))?;
    let record =
        state.sales.save(sale).await.map_err(|error| storage_failure(error, &correlation_id))?;

    info!(
        event_name = "ingestion.sale.recorded",
        correlation_id = %correlation_id,
        product_id = %record.product_id,
        sale_id = record.id.0,
        quantity = record.quantity,
        "sale record ingested"
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            message: "Dados de venda ingeridos com sucesso!".to_string(),
            id: record.id.0,
        }),
    ))
}

async fn ingest_stock(
    State(state): State<ApiState>,
    Json(body): Json<StockIngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiRejection> {
    let correlation_id = Uuid::new_v4().to_string();

    let snapshot =
        validate_stock(body).map_err(|error| reject(error.into_interface(&correlation_id)))?;
    let record = state
        .stock
        .save(snapshot)
        .await
        .map_err(|error| storage_failure(error, &correlation_id))?;

    info!(
        event_name = "ingestion.stock.recorded",
        correlation_id = %correlation_id,
        product_id = %record.product_id,
        stock_record_id = record.id.0,
        quantity_on_hand = record.quantity_on_hand,
        "stock snapshot ingested"
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            message: "Dados de estoque ingeridos com sucesso!".to_string(),
            id: record.id.0,
        }),
    ))
}

async fn suggest(
    State(state): State<ApiState>,
    Path(produto_id): Path<i64>,
) -> Result<Json<SuggestionResponse>, ApiRejection> {
    let correlation_id = Uuid::new_v4().to_string();

    let product_id = ProductId::parse(produto_id)
        .map_err(|error| reject(error.into_interface(&correlation_id)))?;

    let suggestion = state
        .engine
        .suggest(product_id, state.sales.as_ref(), state.stock.as_ref())
        .await
        .map_err(|error| suggestion_failure(error, product_id, &correlation_id))?;

    info!(
        event_name = "suggestion.computed",
        correlation_id = %correlation_id,
        product_id = %product_id,
        method = suggestion.method.label(),
        suggested_quantity = suggestion.suggested_quantity,
        "purchase suggestion computed"
    );

    Ok(Json(SuggestionResponse::from(&suggestion)))
}

fn validate_sale(body: SaleIngestRequest) -> Result<NewSale, DomainError> {
    let product_id = ProductId::parse(body.produto_id)?;
    let quantity = non_negative_quantity("quantidade", body.quantidade)?;
    NewSale::new(product_id, quantity, body.valor_unitario, body.data_venda)
}

fn validate_stock(body: StockIngestRequest) -> Result<NewStockSnapshot, DomainError> {
    NewStockSnapshot::new(
        ProductId::parse(body.produto_id)?,
        non_negative_quantity("quantidade_atual", body.quantidade_atual)?,
        body.data_registro,
    )
}

fn non_negative_quantity(field: &str, value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::InvariantViolation(format!(
            "{field} must be a non-negative integer no larger than {}, got {value}",
            u32::MAX
        ))
    })
}

fn suggestion_failure(
    error: SuggestionError,
    product_id: ProductId,
    correlation_id: &str,
) -> ApiRejection {
    match error.into_interface(correlation_id) {
        InterfaceError::NotFound { correlation_id, .. } => {
            info!(
                event_name = "suggestion.no_history",
                correlation_id = %correlation_id,
                product_id = %product_id,
                "no sales history for product"
            );
            (
                StatusCode::NOT_FOUND,
                Json(ApiError { detail: no_history_message(product_id), correlation_id }),
            )
        }
        other => {
            error!(
                event_name = "suggestion.accessor_failed",
                correlation_id = %other.correlation_id(),
                product_id = %product_id,
                error = %other,
                "history lookup failed"
            );
            reject(other)
        }
    }
}

fn storage_failure(error: RepositoryError, correlation_id: &str) -> ApiRejection {
    error!(
        event_name = "ingestion.storage_failed",
        correlation_id = %correlation_id,
        error = %error,
        "ingestion write failed"
    );
    reject(InterfaceError::ServiceUnavailable {
        message: error.to_string(),
        correlation_id: correlation_id.to_string(),
    })
}

fn reject(error: InterfaceError) -> ApiRejection {
    let status = match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };

    let message = match &error {
        InterfaceError::BadRequest { message, .. } => {
            warn!(
                event_name = "request.rejected",
                correlation_id = %error.correlation_id(),
                reason = %message,
                "request failed validation"
            );
            message.clone()
        }
        InterfaceError::NotFound { .. } | InterfaceError::ServiceUnavailable { .. } => {
            error.user_message().to_string()
        }
    };

    (status, Json(ApiError { detail: message, correlation_id: error.correlation_id().to_string() }))
}
