//! # Node Identity
//!
//! `NodeId` wraps the `@id` string of a graph node so store keys, reference
//! targets and `derivedFrom` back-references cannot be confused with titles
//! or other free-text fields.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag of evidence nodes in the discourse graph.
pub const EVIDENCE_TYPE: &str = "pages:zsoX6_bEl";

/// Type tag of source nodes in the discourse graph.
pub const SOURCE_TYPE: &str = "pages:rVONqNC48";

/// Identifier of a node, as carried in its `@id` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an `@id` string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_display_is_raw_id() {
        assert_eq!(NodeId::new("pages:evidence-001").to_string(), "pages:evidence-001");
    }

    #[test]
    fn test_lookup_by_str_through_borrow() {
        let mut map = HashMap::new();
        map.insert(NodeId::new("pages:source-001"), 7);
        assert_eq!(map.get("pages:source-001"), Some(&7));
    }

    #[test]
    fn test_serde_transparent() {
        let id = NodeId::new("pages:x");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"pages:x\"");
    }
}
