use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use restock_core::replenishment::ReplenishmentPolicy;
use restock_db::{migrations, ping, DbPool};
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    policy: ReplenishmentPolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    Degraded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: Readiness,
    pub detail: String,
}

/// Readiness of the suggestion path: storage reachable and history tables present.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: Readiness,
    pub database: HealthCheck,
    pub schema: HealthCheck,
    pub policy: ReplenishmentPolicy,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool, policy: ReplenishmentPolicy) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool, policy })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_check(&state.db_pool).await;
    let schema = match database.status {
        Readiness::Ready => schema_check(&state.db_pool).await,
        Readiness::Degraded => degraded("skipped: database unreachable".to_string()),
    };
    let status = if schema.status == Readiness::Ready { Readiness::Ready } else { Readiness::Degraded };

    let payload = HealthResponse {
        status,
        database,
        schema,
        policy: state.policy,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code =
        if status == Readiness::Ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match ping(pool).await {
        Ok(()) => ready("database query succeeded".to_string()),
        Err(error) => degraded(format!("database query failed: {error}")),
    }
}

async fn schema_check(pool: &DbPool) -> HealthCheck {
    match migrations::history_table_count(pool).await {
        Ok(2) => ready("sales_data and stock_data present".to_string()),
        Ok(found) => degraded(format!("{found} of 2 history tables present; run migrations")),
        Err(error) => degraded(format!("schema lookup failed: {error}")),
    }
}

fn ready(detail: String) -> HealthCheck {
    HealthCheck { status: Readiness::Ready, detail }
}

fn degraded(detail: String) -> HealthCheck {
    HealthCheck { status: Readiness::Degraded, detail }
}
