//! Event listeners
//!
//! Listeners observe every [`ValidationEvent`] a context produces. They run
//! after the outcome is decided and cannot change it; filtering by schema is
//! up to each listener.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::LoggingConfig;
use crate::error::ListenerError;
use crate::event::ValidationEvent;

/// Observer notified of every validation event
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &ValidationEvent) -> Result<(), ListenerError>;
}

/// Writes one log record per validation event
#[derive(Debug, Clone)]
pub struct LoggingListener {
    log_successes: bool,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self { log_successes: true }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            log_successes: config.log_successes,
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListener for LoggingListener {
    fn on_event(&self, event: &ValidationEvent) -> Result<(), ListenerError> {
        let schema = event.schema_name();
        let at = event.timestamp().to_rfc3339();

        if event.success() {
            if self.log_successes {
                info!(schema, %at, "Schema '{}' validated successfully", schema);
            } else {
                debug!(schema, %at, "Schema '{}' validated successfully", schema);
            }
        } else {
            error!(
                schema,
                %at,
                "Schema '{}' validation failed with errors: {}",
                schema,
                event.errors().join(", ")
            );
        }
        Ok(())
    }
}

/// Per-schema counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaStats {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
}

/// Point-in-time copy of the metrics counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub schemas: BTreeMap<String, SchemaStats>,
}

impl MetricsSnapshot {
    fn record(&mut self, event: &ValidationEvent) {
        let stats = self.schemas.entry(event.schema_name().to_string()).or_default();

        self.total += 1;
        stats.total += 1;

        if event.success() {
            self.successful += 1;
            stats.success += 1;
        } else {
            self.failed += 1;
            stats.failure += 1;
        }
    }
}

/// Aggregates validation counts, overall and per schema
#[derive(Debug, Default)]
pub struct MetricsListener {
    stats: Mutex<MetricsSnapshot>,
}

impl MetricsListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every counter, reflecting all events received so far
    pub fn get_stats(&self) -> MetricsSnapshot {
        self.lock().clone()
    }

    /// Zero all counters
    pub fn reset(&self) {
        *self.lock() = MetricsSnapshot::default();
    }

    // Counters are plain integers, so a poisoned lock still holds usable data.
    fn lock(&self) -> MutexGuard<'_, MetricsSnapshot> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventListener for MetricsListener {
    fn on_event(&self, event: &ValidationEvent) -> Result<(), ListenerError> {
        self.lock().record(event);
        Ok(())
    }
}
