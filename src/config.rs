use crate::error::{CoreError, Result};
use std::collections::HashMap;

/// Runtime configuration for the lifecycle core.
///
/// Defaults are suitable for tests and development; production deploys
/// override per-field via environment variables.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Capacity of the broadcast channel behind the event publisher.
    pub event_channel_capacity: usize,
    /// Caller-configured timeout applied to store calls, in milliseconds.
    pub store_timeout_ms: u64,
    /// Whether the snapshot cache in front of the stores is consulted.
    pub cache_enabled: bool,
    pub custom_settings: HashMap<String, String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 1000,
            store_timeout_ms: 5000,
            cache_enabled: true,
            custom_settings: HashMap::new(),
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("TASKBOARD_EVENT_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                CoreError::Configuration(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        if let Ok(timeout) = std::env::var("TASKBOARD_STORE_TIMEOUT_MS") {
            config.store_timeout_ms = timeout
                .parse()
                .map_err(|e| CoreError::Configuration(format!("Invalid store_timeout_ms: {e}")))?;
        }

        if let Ok(enabled) = std::env::var("TASKBOARD_CACHE_ENABLED") {
            config.cache_enabled = enabled
                .parse()
                .map_err(|e| CoreError::Configuration(format!("Invalid cache_enabled: {e}")))?;
        }

        Ok(config)
    }
}
