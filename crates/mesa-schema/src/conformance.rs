//! # Schema / Policy Conformance
//!
//! The JSON Schema in `schemas/mesa-node.schema.json` and
//! [`mesa_core::policy::validate`] state the same attribution rule twice.
//! This module checks them against each other node by node so that a schema
//! edit which silently loosens (or tightens) the contract is caught.
//!
//! Only evidence and source nodes are compared: the schema's conditional
//! applies to those types alone, while the runtime policy looks at the
//! license of every node.

use serde::Serialize;
use serde_json::{json, Map, Value};

use mesa_core::node::{
    CREATOR_FIELD, ID_FIELD, LICENSE_NAME_FIELD, SOURCE_LINK_FIELD, TITLE_FIELD, TYPE_FIELD,
};
use mesa_core::store::GRAPH_FIELD;
use mesa_core::{policy, GraphLoadError, MissingFields, Node, EVIDENCE_TYPE, SOURCE_TYPE};

use crate::validate::{SchemaValidationError, SchemaValidator, NODE_SCHEMA};

/// A node on which the schema and the policy disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Divergence {
    /// Position in `@graph`.
    pub index: usize,
    pub node_id: String,
    pub schema_ok: bool,
    pub policy_ok: bool,
    /// Fields the policy reported missing.
    pub missing: MissingFields,
}

/// Outcome of [`check_conformance`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConformanceReport {
    /// Nodes of a schema-covered type that were compared.
    pub checked: usize,
    /// Nodes of any other type.
    pub skipped: usize,
    pub divergences: Vec<Divergence>,
}

impl ConformanceReport {
    pub fn is_conformant(&self) -> bool {
        self.divergences.is_empty()
    }
}

fn is_covered_type(node: &Node) -> bool {
    matches!(node.node_type.as_deref(), Some(EVIDENCE_TYPE) | Some(SOURCE_TYPE))
}

/// Compare schema and policy verdicts for every node in `graph`.
///
/// # Errors
///
/// Schema load/build failures, or a [`GraphLoadError`] if `@graph` is not
/// an array of decodable nodes.
pub fn check_conformance(
    validator: &SchemaValidator,
    graph: &Value,
) -> Result<ConformanceReport, SchemaValidationError> {
    let node_validator = validator.build_validator(NODE_SCHEMA)?;

    let items = match graph.get(GRAPH_FIELD) {
        None => return Ok(ConformanceReport::default()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(GraphLoadError::GraphNotArray.into()),
    };

    let mut report = ConformanceReport::default();
    for (index, item) in items.iter().enumerate() {
        let node = Node::from_value(index, item.clone())?;
        if !is_covered_type(&node) {
            report.skipped += 1;
            continue;
        }
        report.checked += 1;

        let schema_ok = node_validator.is_valid(item);
        let verdict = policy::validate(&node);
        if schema_ok != verdict.ok {
            tracing::warn!(
                node_id = %node.id,
                schema_ok,
                policy_ok = verdict.ok,
                "schema and attribution policy disagree"
            );
            report.divergences.push(Divergence {
                index,
                node_id: node.id.to_string(),
                schema_ok,
                policy_ok: verdict.ok,
                missing: verdict.missing,
            });
        }
    }

    tracing::debug!(
        checked = report.checked,
        skipped = report.skipped,
        divergences = report.divergences.len(),
        "conformance check complete"
    );
    Ok(report)
}

/// A synthetic graph covering every combination of node type, license
/// family, and presence of `sourceLink` / `creator` (present, empty, absent,
/// null).
pub fn probe_graph() -> Value {
    let types = [Some(EVIDENCE_TYPE), Some(SOURCE_TYPE), Some("pages:other"), None];
    let licenses = [
        Some("CC BY 4.0"),
        Some("CC0 1.0"),
        Some("CC"),
        Some("cc by 4.0"),
        Some("All Rights Reserved"),
        Some(""),
        None,
    ];
    let fills = [Some(json!("filled")), Some(json!("")), Some(Value::Null), None];

    let mut nodes = Vec::new();
    for (t, node_type) in types.iter().enumerate() {
        for (l, license) in licenses.iter().enumerate() {
            for (s, source_link) in fills.iter().enumerate() {
                for (c, creator) in fills.iter().enumerate() {
                    let mut node = Map::new();
                    node.insert(ID_FIELD.to_string(), json!(format!("probe:{t}-{l}-{s}-{c}")));
                    node.insert(TITLE_FIELD.to_string(), json!("probe"));
                    if let Some(node_type) = node_type {
                        node.insert(TYPE_FIELD.to_string(), json!(node_type));
                    }
                    if let Some(license) = license {
                        node.insert(LICENSE_NAME_FIELD.to_string(), json!(license));
                    }
                    if let Some(value) = source_link {
                        node.insert(SOURCE_LINK_FIELD.to_string(), value.clone());
                    }
                    if let Some(value) = creator {
                        node.insert(CREATOR_FIELD.to_string(), value.clone());
                    }
                    nodes.push(Value::Object(node));
                }
            }
        }
    }
    let mut graph = Map::new();
    graph.insert(GRAPH_FIELD.to_string(), Value::Array(nodes));
    Value::Object(graph)
}
