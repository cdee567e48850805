//! # Enforced Accessor: The Retrieval Choke Point
//!
//! All node data leaves the store through [`EnforcedAccessor`]. Every read
//! path (single get, bulk get, dependency resolution, query) funnels through
//! [`EnforcedAccessor::resolve`], which builds an [`AttributedNode`] or
//! refuses.
//!
//! ## Enforcement Invariant
//!
//! An `AttributedNode` for CC-licensed content always carries a complete
//! [`AttributionBundle`]. The only constructor, [`AttributedNode::new`],
//! validates before building; there is no way to obtain a CC view without
//! attribution. A blocked node is never returned partially or with a
//! warning attached: it is simply absent from the result, and a `tracing`
//! warning records the refusal.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{EnforcementError, GraphLoadError};
use crate::identity::NodeId;
use crate::node::{Node, RESERVED_FIELDS};
use crate::policy::{self, AttributionBundle};
use crate::reference::ReferenceBuilder;
use crate::store::NodeStore;
use crate::temporal::Clock;

/// Point-in-time view of a node that has passed attribution enforcement.
///
/// Serializes as the node's wire fields, with attribution fields
/// overwritten by the bundle's canonical values, plus an `_attribution`
/// block when a bundle is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributedNode {
    #[serde(flatten)]
    node: Node,
    #[serde(rename = "_attribution", skip_serializing_if = "Option::is_none")]
    attribution: Option<AttributionBundle>,
}

impl AttributedNode {
    /// Validate `node` against the attribution policy and build its view.
    ///
    /// # Errors
    ///
    /// `EnforcementError::AttributionMissing` when the node is CC-licensed
    /// but lacks `sourceLink` or `creator`.
    pub fn new(node: &Node) -> Result<Self, EnforcementError> {
        let mut view = node.clone();
        for field in RESERVED_FIELDS {
            view.extra.remove(field);
        }

        if !policy::requires_attribution(node) {
            return Ok(Self {
                node: view,
                attribution: None,
            });
        }

        let Some(bundle) = policy::extract_bundle(node) else {
            return Err(EnforcementError::AttributionMissing {
                id: node.id.to_string(),
                missing: policy::validate(node).missing,
            });
        };

        view.license_name = Some(bundle.license_name().to_string());
        view.source_link = Some(bundle.source_link().to_string());
        view.creator = Some(bundle.creator().to_string());

        Ok(Self {
            node: view,
            attribution: Some(bundle),
        })
    }

    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    /// The node fields, with attribution fields in canonical form.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The embedded bundle, present exactly for CC-licensed content.
    pub fn attribution(&self) -> Option<&AttributionBundle> {
        self.attribution.as_ref()
    }

    pub fn title(&self) -> &str {
        self.node.title_or_empty()
    }

    pub fn content(&self) -> &str {
        self.node.content.as_deref().unwrap_or("")
    }

    /// The serialized JSON form.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A node together with the nodes it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeWithDependencies {
    pub node: AttributedNode,
    pub dependencies: Vec<AttributedNode>,
}

/// Read access to a [`NodeStore`] with attribution enforcement.
#[derive(Debug, Clone)]
pub struct EnforcedAccessor {
    store: NodeStore,
}

impl EnforcedAccessor {
    pub fn new(store: NodeStore) -> Self {
        Self { store }
    }

    /// Load a graph document and wrap it.
    pub fn from_document(document: &Value) -> Result<Self, GraphLoadError> {
        Ok(Self::new(NodeStore::from_document(document)?))
    }

    /// The underlying store. Raw nodes obtained here bypass enforcement and
    /// must not be handed to presenters.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Resolve one id to an attributed view or a structured refusal.
    pub fn resolve(&self, id: &str) -> Result<AttributedNode, EnforcementError> {
        let node = self.store.get(id).ok_or_else(|| EnforcementError::NotFound {
            id: id.to_string(),
        })?;

        AttributedNode::new(node).map_err(|err| {
            if let EnforcementError::AttributionMissing { missing, .. } = &err {
                tracing::warn!(
                    node_id = %id,
                    missing = %missing,
                    "blocked CC-licensed node: missing attribution fields"
                );
            }
            err
        })
    }

    /// Retrieve a node, or `None` if it is absent or blocked.
    pub fn get_node(&self, id: &str) -> Option<AttributedNode> {
        self.resolve(id).ok()
    }

    /// Retrieve several nodes in input order, dropping absent or blocked ids.
    ///
    /// Callers that need to know about drops compare lengths.
    pub fn get_nodes<I>(&self, ids: I) -> Vec<AttributedNode>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.get_node(id.as_ref()))
            .collect()
    }

    /// Retrieve a node plus the node it is `derivedFrom`, both enforced.
    ///
    /// `derivedFrom` is a single-hop back-reference, so there is no graph
    /// walk and no cycle handling.
    pub fn get_node_with_dependencies(&self, id: &str) -> Option<NodeWithDependencies> {
        let node = self.get_node(id)?;
        let dependencies = self.get_nodes(node.node().derived_from.iter());
        Some(NodeWithDependencies { node, dependencies })
    }

    /// Nodes whose stored fields equal every expected value in `filters`,
    /// in store order, each re-enforced through [`get_node`](Self::get_node).
    ///
    /// A field absent from a node never matches. Empty filters match all.
    pub fn query_nodes(&self, filters: &Map<String, Value>) -> Vec<AttributedNode> {
        self.store
            .iter()
            .filter(|node| {
                filters
                    .iter()
                    .all(|(field, expected)| node.field(field).as_ref() == Some(expected))
            })
            .filter_map(|node| self.get_node(node.id.as_str()))
            .collect()
    }

    /// Pre-flight check: would [`get_node`](Self::get_node) succeed for `id`?
    ///
    /// Unlike `get_node`, reports why not and emits no diagnostic.
    pub fn validate_for_retrieval(&self, id: &str) -> Result<(), EnforcementError> {
        let node = self.store.get(id).ok_or_else(|| EnforcementError::NotFound {
            id: id.to_string(),
        })?;
        policy::validate(node).into_result(id)
    }

    /// A reference builder over this accessor's store.
    pub fn references<C: Clock>(&self, clock: C) -> ReferenceBuilder<'_, C> {
        ReferenceBuilder::new(&self.store, clock)
    }
}
