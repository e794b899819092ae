//! Schema Registry
//!
//! Maps schema names to validators and runs validations through a context
//! that records every outcome and broadcasts it to pluggable listeners.
//!
//! ## Features
//!
//! - **Explicit Registry**: constructed by the caller and borrowed by contexts
//! - **Validation History**: per-schema, append-only, scoped to one context
//! - **Event Listeners**: logging and metrics observers, isolated from the outcome
//! - **JSON Schema**: validators compiled from JSON Schema documents
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use schema_registry::{MetricsListener, SchemaRegistry};
//! use serde_json::json;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register_json_schema("user", json!({
//!     "type": "object",
//!     "required": ["username"]
//! }))?;
//!
//! let metrics = Arc::new(MetricsListener::new());
//! let mut ctx = registry.create_default_context();
//! ctx.add_listener(metrics.clone());
//!
//! ctx.validate("user", &json!({"username": "u"}), None)?;
//! assert_eq!(metrics.get_stats().successful, 1);
//! # Ok::<(), schema_registry::RegistryError>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod listener;
pub mod registry;
pub mod validator;

pub use config::RegistryConfig;
pub use context::{HistoryView, ValidationContext};
pub use error::{ListenerError, RegistryError, Result};
pub use event::{Metadata, ValidationEvent};
pub use listener::{EventListener, LoggingListener, MetricsListener, MetricsSnapshot, SchemaStats};
pub use registry::{SchemaRegistry, DEFAULT_CONTEXT_ID};
pub use validator::{FieldError, JsonSchemaValidator, SchemaValidator, ValidatorDefinition};
