//! Validation events

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Caller-supplied metadata attached to an event
pub type Metadata = Map<String, Value>;

/// Record of one validation attempt.
///
/// Built once per `validate` call and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationEvent {
    schema_name: String,
    success: bool,
    errors: Vec<String>,
    timestamp: DateTime<Utc>,
    context: Metadata,
}

impl ValidationEvent {
    /// Event for data accepted by the schema
    pub fn succeeded(schema_name: impl Into<String>, context: Option<Metadata>) -> Self {
        Self::new(schema_name.into(), true, Vec::new(), context)
    }

    /// Event for data rejected by the schema
    pub fn failed(
        schema_name: impl Into<String>,
        errors: Vec<String>,
        context: Option<Metadata>,
    ) -> Self {
        Self::new(schema_name.into(), false, errors, context)
    }

    fn new(schema_name: String, success: bool, errors: Vec<String>, context: Option<Metadata>) -> Self {
        Self {
            schema_name,
            success,
            errors,
            timestamp: Utc::now(),
            context: context.unwrap_or_default(),
        }
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Error messages in validator order; empty for successful events
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn context(&self) -> &Metadata {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_event_has_no_errors() {
        let event = ValidationEvent::succeeded("user", None);
        assert_eq!(event.schema_name(), "user");
        assert!(event.success());
        assert!(event.errors().is_empty());
        assert!(event.context().is_empty());
    }

    #[test]
    fn test_failure_event_keeps_error_order() {
        let errors = vec!["first".to_string(), "second".to_string()];
        let event = ValidationEvent::failed("user", errors.clone(), None);
        assert!(!event.success());
        assert_eq!(event.errors(), errors.as_slice());
    }

    #[test]
    fn test_context_metadata_preserved() {
        let mut meta = Metadata::new();
        meta.insert("request_id".to_string(), json!("abc-123"));
        let event = ValidationEvent::succeeded("user", Some(meta));
        assert_eq!(event.context()["request_id"], json!("abc-123"));
    }

    #[test]
    fn test_timestamp_set_at_construction() {
        let before = Utc::now();
        let event = ValidationEvent::succeeded("user", None);
        let after = Utc::now();
        assert!(event.timestamp() >= before && event.timestamp() <= after);
    }

    #[test]
    fn test_serialized_shape() {
        let event = ValidationEvent::failed("user", vec!["bad".to_string()], None);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["schema_name"], "user");
        assert_eq!(value["success"], false);
        assert_eq!(value["errors"], json!(["bad"]));
        assert!(value["timestamp"].is_string());
    }
}
