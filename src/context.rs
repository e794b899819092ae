//! Validation Context
//!
//! A context runs validations against its registry, records every outcome
//! in a per-schema history and fans each event out to its listeners.
//!
//! ## Flow
//!
//! ```text
//! validate(name, data)
//!   ├─ registry.get(name)      NotRegistered → returned as-is, nothing recorded
//!   ├─ validator.validate(data)
//!   ├─ ValidationEvent         success or failure
//!   ├─ history[name].push(event)
//!   ├─ notify listeners        in insertion order, failures logged and dropped
//!   └─ Ok(record) | Err(SchemaValidationFailed)
//! ```

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ListenerError, RegistryError, Result};
use crate::event::{Metadata, ValidationEvent};
use crate::listener::EventListener;
use crate::registry::SchemaRegistry;
use crate::validator::FieldError;

/// Read-only view of recorded events, keyed by schema name
pub type HistoryView<'a> = BTreeMap<&'a str, &'a [ValidationEvent]>;

/// Per-session validation orchestrator
pub struct ValidationContext<'r> {
    context_id: String,
    registry: &'r SchemaRegistry,
    history: HashMap<String, Vec<ValidationEvent>>,
    listeners: Vec<Arc<dyn EventListener>>,
}

impl<'r> ValidationContext<'r> {
    pub fn new(registry: &'r SchemaRegistry, context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            registry,
            history: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    /// Label given at construction
    pub fn id(&self) -> &str {
        &self.context_id
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Attach a listener. Adding the same listener twice delivers every
    /// event to it twice.
    pub fn add_listener(&mut self, listener: Arc<dyn EventListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Validate `data` against the schema registered as `schema_name`.
    ///
    /// Returns the validator's record on success. Rejected data is recorded
    /// and broadcast before `SchemaValidationFailed` is returned; an unknown
    /// schema is reported as `NotRegistered` without recording anything.
    /// A rejection without field errors is reported as one root error.
    pub fn validate(
        &mut self,
        schema_name: &str,
        data: &Value,
        metadata: Option<Metadata>,
    ) -> Result<Value> {
        let validator = self.registry.get(schema_name)?;

        match validator.validate(data) {
            Ok(record) => {
                self.record(ValidationEvent::succeeded(schema_name, metadata));
                Ok(record)
            }
            Err(mut field_errors) => {
                if field_errors.is_empty() {
                    field_errors.push(FieldError::new("", "rejected by validator"));
                }
                let errors: Vec<String> = field_errors.iter().map(ToString::to_string).collect();
                self.record(ValidationEvent::failed(schema_name, errors.clone(), metadata));
                Err(RegistryError::SchemaValidationFailed {
                    schema_name: schema_name.to_string(),
                    errors,
                    field_errors,
                })
            }
        }
    }

    /// Deliver `event` to every listener in order.
    ///
    /// A listener that errors or panics is logged and skipped.
    pub fn notify_event(&self, event: &ValidationEvent) {
        for (index, listener) in self.listeners.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event)))
                .unwrap_or_else(|payload| Err(ListenerError::Panicked(panic_message(payload))));

            if let Err(e) = outcome {
                error!(
                    context = %self.context_id,
                    schema = event.schema_name(),
                    listener = index,
                    "Error in event listener: {}",
                    e
                );
            }
        }
    }

    /// Recorded events.
    ///
    /// With `None` every schema that has been validated is included. With a
    /// name, the result holds exactly that name, with an empty slice when
    /// nothing has been recorded for it.
    pub fn get_validation_history<'a>(&'a self, schema_name: Option<&'a str>) -> HistoryView<'a> {
        match schema_name {
            Some(name) => {
                let events = self.history.get(name).map(Vec::as_slice).unwrap_or_default();
                BTreeMap::from([(name, events)])
            }
            None => self
                .history
                .iter()
                .map(|(name, events)| (name.as_str(), events.as_slice()))
                .collect(),
        }
    }

    fn record(&mut self, event: ValidationEvent) {
        debug!(
            context = %self.context_id,
            schema = event.schema_name(),
            success = event.success(),
            "Recording validation event"
        );
        let name = event.schema_name().to_string();
        self.history.entry(name.clone()).or_default().push(event);

        if let Some(event) = self.history.get(&name).and_then(|events| events.last()) {
            self.notify_event(event);
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
