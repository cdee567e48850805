//! # mesa-schema: Schema Validation & Conformance
//!
//! The attribution contract enforced at runtime by `mesa-core` is also
//! published as JSON Schema (`schemas/mesa-node.schema.json`,
//! `schemas/mesa-graph.schema.json`) so producers can check documents before
//! they ever reach the accessor.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`SchemaValidator`] loads every schema from a directory, resolves
//! cross-schema `$ref` URIs locally, and validates JSON or YAML documents
//! with structured [`Violation`]s.
//!
//! ## Conformance (`conformance`)
//!
//! [`check_conformance`] runs the schema and the runtime policy side by side
//! over a graph and reports every node on which they disagree.
//!
//! ## Crate Policy
//!
//! - Depends only on `mesa-core` internally.
//! - Schema `$id` URIs must stay under [`SCHEMA_URI_PREFIX`]; the graph
//!   schema refers to the node schema by that URI.

pub mod conformance;
pub mod validate;

pub use conformance::{check_conformance, probe_graph, ConformanceReport, Divergence};
pub use validate::{
    load_document, SchemaValidationError, SchemaValidator, ValidationViolations, Violation,
    GRAPH_SCHEMA, NODE_SCHEMA, SCHEMA_URI_PREFIX,
};
