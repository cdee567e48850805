//! # Error Hierarchy
//!
//! Structured error types for the MESA workspace, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! ## Design
//!
//! - Enforcement refusals ([`EnforcementError`]) are expected outcomes of
//!   the attribution policy, not programmer errors. Callers receive them as
//!   values and decide what to do; nothing in this crate panics on them.
//! - Graph loading errors ([`GraphLoadError`]) name the offending node
//!   position and field so operators can fix the source document.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for MESA.
#[derive(Error, Debug)]
pub enum MesaError {
    /// Attribution enforcement refused the operation.
    #[error("enforcement error: {0}")]
    Enforcement(#[from] EnforcementError),

    /// The graph document could not be loaded into a store.
    #[error("graph load error: {0}")]
    GraphLoad(#[from] GraphLoadError),

    /// Timestamp construction or parsing failure.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An attribution field that can be reported as missing.
///
/// The license name is never reported: a node only requires attribution
/// when its license name is present, so only these two can be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributionField {
    /// The `sourceLink` wire field.
    #[serde(rename = "sourceLink")]
    SourceLink,
    /// The `creator` wire field.
    #[serde(rename = "creator")]
    Creator,
}

impl AttributionField {
    /// Fixed reporting order for missing fields.
    pub const ORDERED: [AttributionField; 2] = [Self::SourceLink, Self::Creator];

    /// The wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceLink => "sourceLink",
            Self::Creator => "creator",
        }
    }
}

impl fmt::Display for AttributionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of missing attribution fields, displayed comma-separated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingFields(Vec<AttributionField>);

impl MissingFields {
    /// Wrap an already-ordered list of fields.
    pub fn new(fields: Vec<AttributionField>) -> Self {
        Self(fields)
    }

    /// Returns true if nothing is missing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of missing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The missing fields in reporting order.
    pub fn fields(&self) -> &[AttributionField] {
        &self.0
    }

    /// Wire names of the missing fields in reporting order.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(AttributionField::as_str).collect()
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// Structured refusal produced at an enforcement point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnforcementError {
    /// The requested node id is absent from the store.
    #[error("node {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A CC-licensed node lacks fields required to build its attribution.
    #[error("CC-licensed node {id} missing required fields: {missing}")]
    AttributionMissing {
        /// The blocked node.
        id: String,
        /// Missing fields in reporting order.
        missing: MissingFields,
    },

    /// A reference to CC-licensed content was requested without the caller
    /// echoing the attribution fields in its context.
    #[error("Cannot reference CC-licensed node without: {missing}")]
    ReferenceContextIncomplete {
        /// The referenced node.
        source_id: String,
        /// Fields absent from the caller's context, in reporting order.
        missing: MissingFields,
    },
}

/// Errors while turning a graph document into a [`NodeStore`](crate::NodeStore).
#[derive(Error, Debug)]
pub enum GraphLoadError {
    /// The document root is not a JSON object.
    #[error("graph document must be a JSON object")]
    NotAnObject,

    /// `@graph` is present but is not an array.
    #[error("`@graph` must be an array of node objects")]
    GraphNotArray,

    /// An entry in `@graph` is not a JSON object.
    #[error("@graph[{index}] is not an object")]
    NodeNotObject {
        /// Position in `@graph`.
        index: usize,
    },

    /// An entry has no string `@id`.
    #[error("@graph[{index}] has no string `@id`")]
    MissingId {
        /// Position in `@graph`.
        index: usize,
    },

    /// An entry carries a key that only enforcement may write.
    #[error("@graph[{index}] carries reserved key `{field}`")]
    ReservedField {
        /// Position in `@graph`.
        index: usize,
        /// The reserved key.
        field: String,
    },

    /// A wire field holds something other than a string.
    #[error("@graph[{index}] field `{field}` must be a string")]
    InvalidField {
        /// Position in `@graph`.
        index: usize,
        /// The offending wire field name.
        field: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display_is_comma_separated() {
        let missing = MissingFields::new(vec![AttributionField::SourceLink, AttributionField::Creator]);
        assert_eq!(missing.to_string(), "sourceLink, creator");
        assert_eq!(missing.names(), vec!["sourceLink", "creator"]);
    }

    #[test]
    fn test_reference_context_incomplete_message() {
        let err = EnforcementError::ReferenceContextIncomplete {
            source_id: "pages:evidence-001".to_string(),
            missing: MissingFields::new(vec![AttributionField::Creator]),
        };
        assert_eq!(err.to_string(), "Cannot reference CC-licensed node without: creator");
    }

    #[test]
    fn test_attribution_missing_message_names_fields() {
        let err = EnforcementError::AttributionMissing {
            id: "pages:evidence-002".to_string(),
            missing: MissingFields::new(vec![AttributionField::Creator]),
        };
        let msg = err.to_string();
        assert!(msg.contains("pages:evidence-002"));
        assert!(msg.ends_with("missing required fields: creator"));
    }

    #[test]
    fn test_enforcement_converts_into_mesa_error() {
        let err: MesaError = EnforcementError::NotFound { id: "x".to_string() }.into();
        assert!(matches!(err, MesaError::Enforcement(EnforcementError::NotFound { .. })));
        assert_eq!(err.to_string(), "enforcement error: node x not found");
    }

    #[test]
    fn test_field_serializes_as_wire_name() {
        let json = serde_json::to_string(&AttributionField::SourceLink).unwrap();
        assert_eq!(json, "\"sourceLink\"");
    }
}
