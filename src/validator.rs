//! Validator capability
//!
//! A validator checks one structured record against one schema and either
//! returns the normalized record or the list of field-level errors. The
//! registry stores validators as opaque [`ValidatorDefinition`]s.

use std::fmt;
use std::sync::Arc;

use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RegistryError, Result};

/// Shared handle to a validator stored in the registry
pub type ValidatorDefinition = Arc<dyn SchemaValidator>;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// JSON pointer to the offending value; empty for the record root
    pub path: String,
    /// Human-readable description of the failure
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Checks records against a schema
pub trait SchemaValidator: Send + Sync {
    /// Validate `data`, returning the normalized record on success.
    ///
    /// A rejection must carry at least one [`FieldError`].
    fn validate(&self, data: &Value) -> std::result::Result<Value, Vec<FieldError>>;
}

impl<F> SchemaValidator for F
where
    F: Fn(&Value) -> std::result::Result<Value, Vec<FieldError>> + Send + Sync,
{
    fn validate(&self, data: &Value) -> std::result::Result<Value, Vec<FieldError>> {
        self(data)
    }
}

/// Validator backed by a compiled JSON Schema document
pub struct JsonSchemaValidator {
    schema: Value,
    compiled: JSONSchema,
}

impl JsonSchemaValidator {
    /// Compile a JSON Schema document
    pub fn compile(name: &str, schema: Value) -> Result<Self> {
        let compiled = JSONSchema::compile(&schema).map_err(|e| RegistryError::InvalidSchema {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { schema, compiled })
    }

    /// The source schema document
    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, data: &Value) -> std::result::Result<Value, Vec<FieldError>> {
        match self.compiled.validate(data) {
            Ok(()) => Ok(data.clone()),
            Err(errors) => Err(errors
                .map(|e| FieldError::new(e.instance_path.to_string(), e.to_string()))
                .collect()),
        }
    }
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
