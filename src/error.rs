//! Error types for the schema registry

use thiserror::Error;

use crate::validator::FieldError;

/// Result type for registry and validation operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Schema registry errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Schema '{name}' not registered")]
    NotRegistered { name: String },

    #[error("Schema '{schema_name}' validation failed: {}", .errors.join(", "))]
    SchemaValidationFailed {
        schema_name: String,
        /// Flattened messages, identical to the recorded event's errors
        errors: Vec<String>,
        /// Structured detail reported by the validator
        field_errors: Vec<FieldError>,
    },

    #[error("Invalid schema name: name must not be empty")]
    InvalidSchemaName,

    #[error("Invalid schema '{name}': {reason}")]
    InvalidSchema { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl RegistryError {
    /// Name of the schema this error is attributed to, if any
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            RegistryError::NotRegistered { name } | RegistryError::InvalidSchema { name, .. } => {
                Some(name.as_str())
            }
            RegistryError::SchemaValidationFailed { schema_name, .. } => Some(schema_name.as_str()),
            _ => None,
        }
    }

    /// True when the data was rejected by a registered schema
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, RegistryError::SchemaValidationFailed { .. })
    }
}

/// Failure raised by an event listener.
///
/// The validation context catches and logs these; they never reach the
/// caller of `validate`.
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("listener '{listener}' failed: {message}")]
    Failed { listener: String, message: String },

    #[error("listener panicked: {0}")]
    Panicked(String),
}

impl ListenerError {
    pub fn failed(listener: impl Into<String>, message: impl Into<String>) -> Self {
        ListenerError::Failed {
            listener: listener.into(),
            message: message.into(),
        }
    }
}
