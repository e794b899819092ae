//! Schema Registry
//!
//! Maps schema names to validators. Contexts created from a registry borrow
//! it, so registration has to finish before validation starts.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::context::ValidationContext;
use crate::error::{RegistryError, Result};
use crate::validator::{JsonSchemaValidator, SchemaValidator, ValidatorDefinition};

/// Context label used when the caller does not supply one
pub const DEFAULT_CONTEXT_ID: &str = "schema_validation";

/// Registry of named validators
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, ValidatorDefinition>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator under `name`, replacing any previous one
    pub fn register(
        &mut self,
        name: impl Into<String>,
        validator: impl SchemaValidator + 'static,
    ) -> Result<()> {
        self.register_definition(name, Arc::new(validator))
    }

    /// Register an already shared validator definition
    pub fn register_definition(
        &mut self,
        name: impl Into<String>,
        validator: ValidatorDefinition,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::InvalidSchemaName);
        }

        if self.schemas.insert(name.clone(), validator).is_some() {
            debug!(schema = %name, "Replaced registered schema");
        } else {
            debug!(schema = %name, "Registered schema");
        }
        Ok(())
    }

    /// Compile a JSON Schema document and register it under `name`
    pub fn register_json_schema(&mut self, name: impl Into<String>, schema: Value) -> Result<()> {
        let name = name.into();
        let validator = JsonSchemaValidator::compile(&name, schema)?;
        self.register(name, validator)
    }

    /// Register every `*.json` file under `dir` as a JSON Schema.
    ///
    /// The schema name is the file name without `.json` and without a
    /// trailing `.schema` (`user.schema.json` registers as `user`).
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let mut loaded = 0;

        for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
            let entry = entry.map_err(|e| RegistryError::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = schema_name_from_path(path) else {
                continue;
            };

            let schema: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            self.register_json_schema(name, schema)?;
            loaded += 1;
        }

        debug!(dir = %dir.as_ref().display(), loaded, "Loaded schema directory");
        Ok(loaded)
    }

    /// Look up the validator registered under `name`
    pub fn get(&self, name: &str) -> Result<ValidatorDefinition> {
        match self.schemas.get(name) {
            Some(validator) => Ok(Arc::clone(validator)),
            None => {
                warn!(schema = %name, "Schema not registered");
                Err(RegistryError::NotRegistered { name: name.to_string() })
            }
        }
    }

    /// Snapshot of all registrations
    pub fn list(&self) -> HashMap<String, ValidatorDefinition> {
        self.schemas.clone()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered names that fuzzily match `query`, best match first
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        let matcher = SkimMatcherV2::default();
        let mut results: Vec<(i64, &str)> = self
            .schemas
            .keys()
            .filter_map(|name| matcher.fuzzy_match(name, query).map(|score| (score, name.as_str())))
            .collect();

        results.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        results.into_iter().take(limit).map(|(_, name)| name).collect()
    }

    /// Create a validation context bound to this registry
    pub fn create_context(&self, context_id: impl Into<String>) -> ValidationContext<'_> {
        ValidationContext::new(self, context_id)
    }

    /// Create a context labelled [`DEFAULT_CONTEXT_ID`]
    pub fn create_default_context(&self) -> ValidationContext<'_> {
        self.create_context(DEFAULT_CONTEXT_ID)
    }
}

fn schema_name_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(".json")?;
    let stem = stem.strip_suffix(".schema").unwrap_or(stem);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::FieldError;
    use serde_json::json;
    use tempfile::tempdir;

    fn accept_all(data: &Value) -> std::result::Result<Value, Vec<FieldError>> {
        Ok(data.clone())
    }

    fn reject_all(_: &Value) -> std::result::Result<Value, Vec<FieldError>> {
        Err(vec![FieldError::new("", "rejected")])
    }

    #[test]
    fn test_register_and_get_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register("user", accept_all).unwrap();
        registry.register("product", accept_all).unwrap();

        assert!(registry.get("user").is_ok());
        assert!(registry.get("product").is_ok());
        assert_eq!(registry.names(), vec!["product", "user"]);

        let err = registry.get("nonexistent").err().unwrap();
        assert_eq!(err.to_string(), "Schema 'nonexistent' not registered");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = SchemaRegistry::new();
        registry.register("user", accept_all).unwrap();
        registry.register("user", reject_all).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("user").unwrap().validate(&json!({})).is_err());
    }

    #[test]
    fn test_reregistering_same_definition_is_idempotent() {
        let mut registry = SchemaRegistry::new();
        let definition: ValidatorDefinition = Arc::new(accept_all);
        registry.register_definition("user", Arc::clone(&definition)).unwrap();
        registry.register_definition("user", Arc::clone(&definition)).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get("user").unwrap(), &definition));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = SchemaRegistry::new();
        let err = registry.register("", accept_all).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSchemaName));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let mut registry = SchemaRegistry::new();
        registry.register("user", accept_all).unwrap();

        let mut listed = registry.list();
        listed.remove("user");
        listed.insert("ghost".to_string(), Arc::new(accept_all));

        assert!(registry.contains("user"));
        assert!(!registry.contains("ghost"));
    }

    #[test]
    fn test_context_label_not_unique() {
        let registry = SchemaRegistry::new();
        let a = registry.create_context("session");
        let b = registry.create_context("session");
        assert_eq!(a.id(), b.id());
        assert_eq!(registry.create_default_context().id(), DEFAULT_CONTEXT_ID);
    }

    #[test]
    fn test_suggest_ranks_closest_names() {
        let mut registry = SchemaRegistry::new();
        for name in ["user", "user_profile", "product", "order"] {
            registry.register(name, accept_all).unwrap();
        }

        let suggestions = registry.suggest("usr", 5);
        assert!(suggestions.contains(&"user"));
        assert!(!suggestions.contains(&"order"));
        assert!(registry.suggest("zzz", 5).is_empty());
        assert_eq!(registry.suggest("u", 1).len(), 1);
    }

    #[test]
    fn test_load_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("user.schema.json"),
            r#"{"type": "object", "required": ["username"]}"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("catalog")).unwrap();
        fs::write(dir.path().join("catalog/product.json"), r#"{"type": "object"}"#).unwrap();
        fs::write(dir.path().join("README.md"), "not a schema").unwrap();

        let mut registry = SchemaRegistry::new();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 2);
        assert_eq!(registry.names(), vec!["product", "user"]);
        assert!(registry.get("user").unwrap().validate(&json!({})).is_err());
    }

    #[test]
    fn test_load_dir_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let mut registry = SchemaRegistry::new();
        assert!(matches!(registry.load_dir(dir.path()), Err(RegistryError::Json(_))));
    }

    #[test]
    fn test_schema_name_from_path() {
        assert_eq!(schema_name_from_path(Path::new("a/user.schema.json")).as_deref(), Some("user"));
        assert_eq!(schema_name_from_path(Path::new("order.json")).as_deref(), Some("order"));
        assert_eq!(schema_name_from_path(Path::new("notes.txt")), None);
        assert_eq!(schema_name_from_path(Path::new(".schema.json")), None);
    }
}
