//! # Graph Nodes
//!
//! A [`Node`] is one entry of a graph document's `@graph` array. The wire
//! field names (`@id`, `@type`, `licenseName`, `licenseLink`, `sourceLink`,
//! `creator`, `title`, `content`, `derivedFrom`) are an interoperability
//! contract and are kept verbatim on serialization. Fields outside that set
//! are preserved in [`Node::extra`].
//!
//! A `null` wire value is treated the same as an absent field. The keys in
//! [`RESERVED_FIELDS`] are emitted by enforcement alone and are rejected on
//! input.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GraphLoadError;
use crate::identity::NodeId;

/// Wire name of the node identifier.
pub const ID_FIELD: &str = "@id";
/// Wire name of the node type tag.
pub const TYPE_FIELD: &str = "@type";
/// Wire name of the title.
pub const TITLE_FIELD: &str = "title";
/// Wire name of the free-text content.
pub const CONTENT_FIELD: &str = "content";
/// Wire name of the license name.
pub const LICENSE_NAME_FIELD: &str = "licenseName";
/// Wire name of the license link.
pub const LICENSE_LINK_FIELD: &str = "licenseLink";
/// Wire name of the source link.
pub const SOURCE_LINK_FIELD: &str = "sourceLink";
/// Wire name of the creator.
pub const CREATOR_FIELD: &str = "creator";
/// Wire name of the derived-from back-reference.
pub const DERIVED_FROM_FIELD: &str = "derivedFrom";

/// Keys written only by enforcement. A stored node may not carry them.
pub const RESERVED_FIELDS: [&str; 2] = ["_attribution", "_attributionRequired"];

/// A content node from the discourse graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier (`@id`).
    #[serde(rename = "@id")]
    pub id: NodeId,

    /// Type tag (`@type`).
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(rename = "licenseName", default, skip_serializing_if = "Option::is_none")]
    pub license_name: Option<String>,

    #[serde(rename = "licenseLink", default, skip_serializing_if = "Option::is_none")]
    pub license_link: Option<String>,

    #[serde(rename = "sourceLink", default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Single optional back-reference to the node this one was derived from.
    #[serde(rename = "derivedFrom", default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<NodeId>,

    /// Any other fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// A node with only an identifier.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            node_type: None,
            title: None,
            content: None,
            license_name: None,
            license_link: None,
            source_link: None,
            creator: None,
            derived_from: None,
            extra: Map::new(),
        }
    }

    /// Decode the node at `@graph[index]`.
    ///
    /// Unlike the derived `Deserialize`, this reports which entry and which
    /// field was malformed.
    pub fn from_value(index: usize, value: Value) -> Result<Self, GraphLoadError> {
        let Value::Object(mut obj) = value else {
            return Err(GraphLoadError::NodeNotObject { index });
        };

        if let Some(field) = RESERVED_FIELDS.iter().find(|f| obj.contains_key(**f)) {
            return Err(GraphLoadError::ReservedField {
                index,
                field: (*field).to_string(),
            });
        }

        let id = match obj.remove(ID_FIELD) {
            Some(Value::String(id)) => NodeId::from(id),
            _ => return Err(GraphLoadError::MissingId { index }),
        };

        let mut take = |field: &str| take_string(&mut obj, index, field);
        let node_type = take(TYPE_FIELD)?;
        let title = take(TITLE_FIELD)?;
        let content = take(CONTENT_FIELD)?;
        let license_name = take(LICENSE_NAME_FIELD)?;
        let license_link = take(LICENSE_LINK_FIELD)?;
        let source_link = take(SOURCE_LINK_FIELD)?;
        let creator = take(CREATOR_FIELD)?;
        let derived_from = take(DERIVED_FROM_FIELD)?.map(NodeId::from);

        Ok(Self {
            id,
            node_type,
            title,
            content,
            license_name,
            license_link,
            source_link,
            creator,
            derived_from,
            extra: obj,
        })
    }

    /// The stored value of a wire field, if any.
    ///
    /// Used for query filtering: an absent field yields `None`, which never
    /// equals an expected value.
    pub fn field(&self, name: &str) -> Option<Value> {
        let known = match name {
            ID_FIELD => return Some(Value::String(self.id.to_string())),
            TYPE_FIELD => &self.node_type,
            TITLE_FIELD => &self.title,
            CONTENT_FIELD => &self.content,
            LICENSE_NAME_FIELD => &self.license_name,
            LICENSE_LINK_FIELD => &self.license_link,
            SOURCE_LINK_FIELD => &self.source_link,
            CREATOR_FIELD => &self.creator,
            DERIVED_FROM_FIELD => {
                return self
                    .derived_from
                    .as_ref()
                    .map(|id| Value::String(id.to_string()))
            }
            other => return self.extra.get(other).cloned(),
        };
        known.clone().map(Value::String)
    }

    /// The title, or an empty string when absent.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

fn take_string(
    obj: &mut Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<Option<String>, GraphLoadError> {
    match obj.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value::<String>(v)
            .map(Some)
            .map_err(|source| GraphLoadError::InvalidField {
                index,
                field: field.to_string(),
                source,
            }),
    }
}
