mod api;
mod bootstrap;
mod health;
mod presentation;

use std::time::Duration;

use anyhow::Result;
use restock_core::config::{AppConfig, LoadOptions};
use tokio::sync::watch;
use tracing::{info, warn};

fn init_logging(config: &AppConfig) {
    use restock_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let routes = api::router(api::ApiState::from_pool(app.db_pool.clone(), app.engine.clone()))
        .merge(health::router(app.db_pool.clone(), *app.engine.policy()));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "restock-server listening"
    );

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, routes).with_graceful_shutdown(async move {
        let _ = stop_rx.changed().await;
    });
    let mut serving = tokio::spawn(async move { server.await });

    tokio::select! {
        joined = &mut serving => {
            joined??;
            return Ok(());
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        drain_secs = app.config.server.graceful_shutdown_secs,
        "shutdown requested, draining in-flight requests"
    );
    let _ = stop_tx.send(true);

    let drain = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    match tokio::time::timeout(drain, &mut serving).await {
        Ok(joined) => joined??,
        Err(_) => {
            warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                "in-flight requests did not finish before the drain deadline"
            );
            serving.abort();
        }
    }

    app.db_pool.close().await;
    info!(event_name = "system.server.stopped", correlation_id = "shutdown", "restock-server stopped");
    Ok(())
}
