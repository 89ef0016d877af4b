pub mod accessories;
pub mod catalog;
pub mod config;
pub mod doctor;
pub mod migrate;
pub mod recommend;
pub mod seed;

use mountfinder_core::config::{AppConfig, LoadOptions};
use mountfinder_core::errors::{ApplicationError, InterfaceError};
use mountfinder_db::{connect_with_settings, DbPool};
use serde::Serialize;
use serde_json::Value;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_STORE_UNAVAILABLE: u8 = 4;
pub const EXIT_MIGRATION: u8 = 5;
pub const EXIT_SEED_VERIFICATION: u8 = 6;
pub const EXIT_INVALID_SELECTION: u8 = 7;
pub const EXIT_DATA_INTEGRITY: u8 = 8;
pub const EXIT_USAGE: u8 = 64;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with_data(command, error_class, message, exit_code, None)
    }

    pub fn failure_with_data(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn text(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Loads config and a current-thread runtime, or the failure to report for `command`.
pub(crate) fn prepare(
    command: &str,
) -> Result<(AppConfig, tokio::runtime::Runtime), CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })?;

    let runtime =
        tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            )
        })?;

    Ok((config, runtime))
}

pub(crate) async fn open_pool(config: &AppConfig) -> Result<DbPool, ApplicationError> {
    connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ApplicationError::StoreUnavailable(error.to_string()))
}

pub(crate) fn new_correlation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Renders an application failure as a warning. The catalog and the request are
/// left untouched, so the caller can retry with a corrected selection.
pub(crate) fn application_failure(
    command: &str,
    error: ApplicationError,
    correlation_id: &str,
    json_output: bool,
) -> CommandResult {
    let error_class = error.class();
    let interface = error.into_interface(correlation_id);
    let exit_code = match interface {
        InterfaceError::BadRequest { .. } => EXIT_INVALID_SELECTION,
        InterfaceError::ServiceUnavailable { .. } => EXIT_STORE_UNAVAILABLE,
        InterfaceError::Internal { .. } => EXIT_DATA_INTEGRITY,
    };

    tracing::warn!(
        event_name = "cli.command.failed",
        command,
        correlation_id,
        error_class,
        error = %interface,
        "command failed"
    );

    if json_output {
        return CommandResult::failure_with_data(
            command,
            error_class,
            format!("{} ({interface})", interface.user_message()),
            exit_code,
            Some(serde_json::json!({ "correlation_id": interface.correlation_id() })),
        );
    }

    CommandResult {
        exit_code,
        output: format!(
            "warning: {}\n  detail: {interface}\n  correlation id: {}",
            interface.user_message(),
            interface.correlation_id()
        ),
    }
}
