//! # Node Store
//!
//! In-memory mapping from `@id` to [`Node`], populated once from a graph
//! document and read-only afterwards. Iteration follows document order.
//!
//! A document without `@graph` yields an empty store. When two entries share
//! an `@id`, the later entry replaces the earlier one but keeps its position.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::GraphLoadError;
use crate::identity::NodeId;
use crate::node::Node;

/// Wire name of the node array in a graph document.
pub const GRAPH_FIELD: &str = "@graph";

/// Read-only node storage keyed by `@id`.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl NodeStore {
    /// Build a store from a graph document (`{"@graph": [...]}`).
    pub fn from_document(document: &Value) -> Result<Self, GraphLoadError> {
        let obj = document.as_object().ok_or(GraphLoadError::NotAnObject)?;
        let entries = match obj.get(GRAPH_FIELD) {
            None => return Ok(Self::default()),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(GraphLoadError::GraphNotArray),
        };

        let nodes = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| Node::from_value(i, entry.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_nodes(nodes))
    }

    /// Build a store from already-decoded nodes.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut store = Self::default();
        for node in nodes {
            match store.index.get(&node.id) {
                Some(&pos) => {
                    tracing::warn!(node_id = %node.id, "duplicate @id in graph; later entry wins");
                    store.nodes[pos] = node;
                }
                None => {
                    store.index.insert(node.id.clone(), store.nodes.len());
                    store.nodes.push(node);
                }
            }
        }
        tracing::debug!(node_count = store.nodes.len(), "node store built");
        store
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_graph_is_empty_store() {
        let store = NodeStore::from_document(&json!({})).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_graph_must_be_array() {
        let err = NodeStore::from_document(&json!({"@graph": {"@id": "a"}})).unwrap_err();
        assert!(matches!(err, GraphLoadError::GraphNotArray));
    }

    #[test]
    fn test_document_must_be_object() {
        let err = NodeStore::from_document(&json!([])).unwrap_err();
        assert!(matches!(err, GraphLoadError::NotAnObject));
    }

    #[test]
    fn test_iteration_follows_document_order() {
        let store = NodeStore::from_document(&json!({
            "@graph": [{"@id": "c"}, {"@id": "a"}, {"@id": "b"}]
        }))
        .unwrap();
        let ids: Vec<&str> = store.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_id_later_wins_first_position_kept() {
        let store = NodeStore::from_document(&json!({
            "@graph": [
                {"@id": "a", "title": "first"},
                {"@id": "b"},
                {"@id": "a", "title": "second"}
            ]
        }))
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().title.as_deref(), Some("second"));
        let ids: Vec<&str> = store.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_bad_entry_fails_whole_load() {
        let err = NodeStore::from_document(&json!({
            "@graph": [{"@id": "a"}, {"title": "no id"}]
        }))
        .unwrap_err();
        assert!(matches!(err, GraphLoadError::MissingId { index: 1 }));
    }

    #[test]
    fn test_get_and_contains() {
        let store = NodeStore::from_nodes(vec![Node::new("pages:source-001")]);
        assert!(store.contains("pages:source-001"));
        assert!(store.get("pages:missing").is_none());
    }
}
