pub mod config;
pub mod doctor;
pub mod migrate;
pub mod seed;
pub mod suggest;

use restock_core::config::{AppConfig, LoadOptions};
use restock_db::{connect_with_settings, DbPool};
use serde::Serialize;

/// Rendered output of one CLI invocation plus the process exit code.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

/// Failure category; fixes both the `error_class` label and the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    InvalidInput,
    ConfigValidation,
    RuntimeInit,
    Serialization,
    DbConnectivity,
    Migration,
    SchemaIncomplete,
    SeedExecution,
    SeedVerification,
    NotFound,
    Persistence,
}

impl FailureClass {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::InvalidInput | Self::ConfigValidation => 2,
            Self::RuntimeInit | Self::Serialization => 3,
            Self::DbConnectivity => 4,
            Self::Migration | Self::SchemaIncomplete | Self::SeedExecution => 5,
            Self::SeedVerification => 6,
            Self::NotFound => 7,
            Self::Persistence => 8,
        }
    }
}

/// A classified failure raised inside a command body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub class: FailureClass,
    pub message: String,
}

impl CommandFailure {
    pub fn new(class: FailureClass, message: impl Into<String>) -> Self {
        Self { class, message: message.into() }
    }
}

#[derive(Debug, Serialize)]
struct CommandOutcome<'a> {
    command: &'a str,
    status: &'static str,
    error_class: Option<FailureClass>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload =
            CommandOutcome { command, status: "ok", error_class: None, message: message.into() };
        Self { exit_code: 0, output: serialize_payload(&payload) }
    }

    pub fn failure(command: &str, failure: CommandFailure) -> Self {
        let payload = CommandOutcome {
            command,
            status: "error",
            error_class: Some(failure.class),
            message: failure.message,
        };
        Self { exit_code: failure.class.exit_code(), output: serialize_payload(&payload) }
    }

    pub fn from_outcome(command: &str, outcome: Result<String, CommandFailure>) -> Self {
        match outcome {
            Ok(message) => Self::success(command, message),
            Err(failure) => Self::failure(command, failure),
        }
    }
}

/// Layered config for a command; failures are config-validation class.
pub fn load_config() -> Result<AppConfig, CommandFailure> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandFailure::new(FailureClass::ConfigValidation, format!("configuration issue: {error}"))
    })
}

pub fn current_thread_runtime() -> Result<tokio::runtime::Runtime, CommandFailure> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandFailure::new(
            FailureClass::RuntimeInit,
            format!("failed to initialize async runtime: {error}"),
        )
    })
}

pub async fn open_pool(config: &AppConfig) -> Result<DbPool, CommandFailure> {
    connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| CommandFailure::new(FailureClass::DbConnectivity, error.to_string()))
}

fn serialize_payload(payload: &CommandOutcome<'_>) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
