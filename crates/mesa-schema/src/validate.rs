//! # Schema Validation
//!
//! Runtime validation of graph documents and individual nodes against the
//! MESA JSON Schemas (Draft 2020-12).
//!
//! ## Trust Boundary
//!
//! The schema is the authoritative statement of the attribution contract.
//! Documents that fail validation are rejected with structured violations
//! carrying the instance path, the schema path, and a message.
//!
//! ## Schema Resolution
//!
//! Schemas use `$id` URIs of the form
//! `https://schemas.discourse-graph.org/mesa/<filename>`, and
//! `mesa-graph.schema.json` refers to `mesa-node.schema.json` that way.
//! These references resolve against the schemas loaded from disk; nothing is
//! fetched over the network.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

/// URI prefix under which every MESA schema is published.
pub const SCHEMA_URI_PREFIX: &str = "https://schemas.discourse-graph.org/mesa/";

/// Schema for a single node.
pub const NODE_SCHEMA: &str = "mesa-node.schema.json";

/// Schema for a whole `{"@graph": [...]}` document.
pub const GRAPH_SCHEMA: &str = "mesa-graph.schema.json";

/// Resolves `$ref` URIs from the in-memory schema set.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        // Draft metaschemas and anything else unknown resolve to the
        // permissive schema instead of a network fetch.
        tracing::debug!(uri = uri_str, "unresolved $ref; using permissive schema");
        Ok(serde_json::json!({}))
    }
}

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Schema the document was validated against.
        schema_name: String,
        /// Individual violations.
        violations: ValidationViolations,
    },

    /// A schema could not be found or parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema filename or directory.
        schema_name: String,
        /// Why it could not be loaded.
        reason: String,
    },

    /// A document could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path of the document.
        path: String,
        /// Why it could not be loaded.
        reason: String,
    },

    /// A schema parsed but did not compile into a validator.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename.
        schema_name: String,
        /// Compiler message.
        reason: String,
    },

    /// The graph could not be decoded into nodes for policy evaluation.
    #[error("graph decode error: {0}")]
    GraphLoad(#[from] mesa_core::GraphLoadError),

    /// IO error reading a schema.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Validator over the `*.schema.json` files of one directory.
///
/// Schemas are read once at construction. `SchemaValidator` is
/// `Send + Sync`.
#[derive(Debug)]
pub struct SchemaValidator {
    schema_dir: PathBuf,
    schemas: HashMap<String, Value>,
}

impl SchemaValidator {
    /// Load every `*.schema.json` file in `schema_dir`, indexed by filename.
    ///
    /// # Errors
    ///
    /// `SchemaLoadError` if the directory cannot be read or a schema is not
    /// valid JSON.
    pub fn new(schema_dir: impl AsRef<Path>) -> Result<Self, SchemaValidationError> {
        let schema_dir = schema_dir.as_ref().to_path_buf();
        let mut schemas = HashMap::new();

        let entries = std::fs::read_dir(&schema_dir).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                schema_name: schema_dir.display().to_string(),
                reason: format!("cannot read schema directory: {e}"),
            }
        })?;

        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".schema.json") {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            let value: Value = serde_json::from_str(&content).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    schema_name: name.to_string(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?;
            schemas.insert(name.to_string(), value);
        }

        Ok(Self { schema_dir, schemas })
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Names of all loaded schemas, sorted.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Retriever with every loaded schema reachable by `$id`, by canonical
    /// URI, and by bare filename.
    fn retriever(&self) -> LocalSchemaRetriever {
        let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
        for (filename, value) in &self.schemas {
            schemas_by_uri.insert(format!("{SCHEMA_URI_PREFIX}{filename}"), value.clone());
            if let Some(id) = value.get("$id").and_then(Value::as_str) {
                schemas_by_uri.insert(id.to_string(), value.clone());
            }
            schemas_by_uri.insert(filename.clone(), value.clone());
        }
        LocalSchemaRetriever { schemas_by_uri }
    }

    /// Compile the named schema.
    ///
    /// # Errors
    ///
    /// `SchemaLoadError` if no such schema was loaded, `ValidatorBuildError`
    /// if it does not compile.
    pub fn build_validator(&self, schema_name: &str) -> Result<Validator, SchemaValidationError> {
        let schema_value =
            self.schemas
                .get(schema_name)
                .ok_or_else(|| SchemaValidationError::SchemaLoadError {
                    schema_name: schema_name.to_string(),
                    reason: format!("schema not found in {}", self.schema_dir.display()),
                })?;

        jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(self.retriever())
            .build(schema_value)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Validate `instance` against the named schema.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` with every violation when the instance is invalid.
    pub fn validate_document(
        &self,
        instance: &Value,
        schema_name: &str,
    ) -> Result<(), SchemaValidationError> {
        let validator = self.build_validator(schema_name)?;
        check(&validator, instance, schema_name)
    }

    /// Validate a single node against [`NODE_SCHEMA`].
    pub fn validate_node(&self, node: &Value) -> Result<(), SchemaValidationError> {
        self.validate_document(node, NODE_SCHEMA)
    }

    /// Validate a whole graph document against [`GRAPH_SCHEMA`].
    ///
    /// Violations inside nodes carry instance paths such as `/@graph/1`.
    pub fn validate_graph(&self, graph: &Value) -> Result<(), SchemaValidationError> {
        self.validate_document(graph, GRAPH_SCHEMA)
    }

    /// Load a JSON or YAML document from disk and validate it.
    pub fn validate_file(
        &self,
        document_path: &Path,
        schema_name: &str,
    ) -> Result<(), SchemaValidationError> {
        let value = load_document(document_path)?;
        self.validate_document(&value, schema_name)
            .map_err(|e| match e {
                SchemaValidationError::ValidationFailed { violations, .. } => {
                    SchemaValidationError::ValidationFailed {
                        schema_name: format!("{schema_name} ({})", document_path.display()),
                        violations,
                    }
                }
                other => other,
            })
    }
}

/// Run a compiled validator and collect violations.
pub(crate) fn check(
    validator: &Validator,
    instance: &Value,
    schema_name: &str,
) -> Result<(), SchemaValidationError> {
    let violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::ValidationFailed {
            schema_name: schema_name.to_string(),
            violations: ValidationViolations { violations },
        })
    }
}

/// Read a document, parsing `.yaml`/`.yml` as YAML and anything else as JSON.
pub fn load_document(path: &Path) -> Result<Value, SchemaValidationError> {
    let load_error = |reason: String| SchemaValidationError::DocumentLoadError {
        path: path.display().to_string(),
        reason,
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| load_error(format!("cannot read file: {e}")))?;

    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map_err(|e| load_error(format!("invalid YAML: {e}"))),
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo_root() -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates/
        dir.pop(); // repo root
        dir
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::new(repo_root().join("schemas")).unwrap()
    }

    #[test]
    fn test_load_schemas() {
        let v = validator();
        assert_eq!(v.schema_names(), vec![GRAPH_SCHEMA, NODE_SCHEMA]);
    }

    #[test]
    fn test_valid_cc_evidence() {
        validator()
            .validate_node(&json!({
                "@id": "pages:test-001",
                "@type": "pages:zsoX6_bEl",
                "title": "Test Evidence",
                "licenseName": "CC BY 4.0",
                "licenseLink": "https://creativecommons.org/licenses/by/4.0/",
                "sourceLink": "https://example.com/data",
                "creator": "Jane Smith"
            }))
            .unwrap();
    }

    #[test]
    fn test_cc_evidence_missing_source_link() {
        let err = validator()
            .validate_node(&json!({
                "@id": "pages:test-002",
                "@type": "pages:zsoX6_bEl",
                "licenseName": "CC BY 4.0",
                "creator": "Jane Smith"
            }))
            .unwrap_err();
        match &err {
            SchemaValidationError::ValidationFailed { violations, .. } => {
                assert!(violations
                    .violations()
                    .iter()
                    .any(|v| v.message.contains("sourceLink")));
            }
            other => panic!("expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn test_cc_evidence_missing_creator() {
        let err = validator()
            .validate_node(&json!({
                "@id": "pages:test-003",
                "@type": "pages:zsoX6_bEl",
                "licenseName": "CC BY 4.0",
                "sourceLink": "https://example.com/data"
            }))
            .unwrap_err();
        assert!(err.to_string().contains("creator"));
    }

    #[test]
    fn test_non_cc_evidence_needs_nothing() {
        validator()
            .validate_node(&json!({
                "@id": "pages:test-004",
                "@type": "pages:zsoX6_bEl",
                "title": "Test Evidence",
                "licenseName": "All Rights Reserved"
            }))
            .unwrap();
    }

    #[test]
    fn test_valid_cc_source_with_extra_field() {
        validator()
            .validate_node(&json!({
                "@id": "pages:test-005",
                "@type": "pages:rVONqNC48",
                "title": "Test Dataset",
                "licenseName": "CC0 1.0",
                "sourceLink": "https://example.com/dataset",
                "creator": "Research Team",
                "sourceType": "Dataset"
            }))
            .unwrap();
    }

    #[test]
    fn test_cc_source_empty_creator_rejected() {
        let err = validator()
            .validate_node(&json!({
                "@id": "pages:test-006",
                "@type": "pages:rVONqNC48",
                "licenseName": "CC BY 4.0",
                "sourceLink": "https://example.com/dataset",
                "creator": ""
            }))
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::ValidationFailed { .. }));
    }

    #[test]
    fn test_stored_attribution_block_rejected() {
        let v = validator();
        for key in ["_attribution", "_attributionRequired"] {
            let mut node = json!({"@id": "pages:x", "licenseName": "MIT"});
            node[key] = json!({"creator": "Fake"});
            assert!(v.validate_node(&node).is_err(), "{key} accepted");
        }
    }

    #[test]
    fn test_graph_schema_resolves_node_ref() {
        let err = validator()
            .validate_graph(&json!({
                "@graph": [
                    {"@id": "ok", "@type": "pages:zsoX6_bEl", "licenseName": "MIT"},
                    {"@id": "bad", "@type": "pages:zsoX6_bEl", "licenseName": "CC BY 4.0"}
                ]
            }))
            .unwrap_err();
        match err {
            SchemaValidationError::ValidationFailed { violations, .. } => {
                assert!(violations
                    .violations()
                    .iter()
                    .all(|v| v.instance_path.starts_with("/@graph/1")));
            }
            other => panic!("expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn test_schema_not_found() {
        let err = validator()
            .validate_document(&json!({}), "nonexistent.schema.json")
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaLoadError { .. }));
    }

    #[test]
    fn test_missing_schema_dir() {
        let err = SchemaValidator::new(repo_root().join("no-such-dir")).unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaLoadError { .. }));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""@id" is a required property"#.to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn test_violation_display_path() {
        let v = Violation {
            instance_path: "/@graph/1/creator".to_string(),
            schema_path: "/allOf/0/then/properties/creator/minLength".to_string(),
            message: r#""" is shorter than 1 character"#.to_string(),
        };
        assert!(v.to_string().starts_with("  /@graph/1/creator:"));
    }
}
