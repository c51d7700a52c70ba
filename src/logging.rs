//! # Structured Logging Module
//!
//! Environment-aware structured logging for lifecycle operations and
//! event emission, built on `tracing`.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(EnvFilter::new(log_level)),
        );

        // A global subscriber may already be set by the embedding
        // application; that is not an error.
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }

        tracing::info!(
            environment = %environment,
            "structured logging initialized"
        );
    });
}

fn get_environment() -> String {
    std::env::var("TASKBOARD_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for task lifecycle operations.
pub fn log_task_operation(
    operation: &str,
    task_id: Option<i64>,
    actor_id: Option<i64>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        task_id = task_id,
        actor_id = actor_id,
        status = %status,
        details = details,
        "TASK_OPERATION"
    );
}

/// Log structured data for user lifecycle operations.
pub fn log_user_operation(
    operation: &str,
    user_id: Option<i64>,
    username: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        user_id = user_id,
        username = username,
        status = %status,
        details = details,
        "USER_OPERATION"
    );
}

/// Log a swallowed event-publish failure. Emission is best-effort, so
/// these never propagate to the caller.
pub fn log_event_publish_failure(event_kind: &str, error: &str) {
    tracing::warn!(
        event_kind = %event_kind,
        error = %error,
        "EVENT_PUBLISH_FAILED"
    );
}
